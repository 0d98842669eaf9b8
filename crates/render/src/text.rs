use glam::Vec2;
use std::collections::HashMap;

/// Tabs advance by this many spaces.
const TAB_WIDTH: f32 = 4.0;
/// Substituted for characters the font has no glyph for.
const FALLBACK: char = '?';

/// Quad of a visible glyph: plane bounds in em units (y up, relative to the
/// pen on the baseline) and the matching atlas rectangle in texture
/// coordinates (v up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub plane_min: Vec2,
    pub plane_max: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance in em units.
    pub advance: f32,
    /// `None` for glyphs with no ink, such as space.
    pub quad: Option<GlyphQuad>,
}

/// Per-character metrics for one font atlas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontGeometry {
    glyphs: HashMap<char, GlyphMetrics>,
    line_height: f32,
}

impl FontGeometry {
    pub fn new(line_height: f32) -> Self {
        Self {
            glyphs: HashMap::new(),
            line_height,
        }
    }

    pub fn insert(&mut self, c: char, metrics: GlyphMetrics) {
        self.glyphs.insert(c, metrics);
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&c)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Baseline-to-baseline distance in em units.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    fn resolve(&self, c: char) -> Option<&GlyphMetrics> {
        self.glyph(c).or_else(|| self.glyph(FALLBACK))
    }

    /// Lay out `text` starting with the pen at the origin. Coordinates are in
    /// em units; multiply by the font size to get world units.
    ///
    /// `\n` starts a new line below, `\t` advances four spaces, `\r` is
    /// ignored. Characters missing from the font render as `?`, or are
    /// skipped if `?` is missing too.
    pub fn layout(&self, text: &str) -> Vec<GlyphQuad> {
        let mut pen = Vec2::ZERO;
        let mut quads = Vec::with_capacity(text.len());
        let space = self.glyph(' ').map_or(0.0, |g| g.advance);

        for c in text.chars() {
            match c {
                '\n' => {
                    pen.x = 0.0;
                    pen.y -= self.line_height;
                }
                '\r' => {}
                '\t' => pen.x += space * TAB_WIDTH,
                _ => {
                    let Some(metrics) = self.resolve(c) else {
                        continue;
                    };
                    if let Some(q) = metrics.quad {
                        quads.push(GlyphQuad {
                            plane_min: q.plane_min + pen,
                            plane_max: q.plane_max + pen,
                            ..q
                        });
                    }
                    pen.x += metrics.advance;
                }
            }
        }
        quads
    }

    /// Width of the widest line and total height, in em units.
    pub fn measure(&self, text: &str) -> Vec2 {
        let space = self.glyph(' ').map_or(0.0, |g| g.advance);
        let mut widest: f32 = 0.0;
        let mut lines = 1;
        let mut x = 0.0;
        for c in text.chars() {
            match c {
                '\n' => {
                    widest = widest.max(x);
                    x = 0.0;
                    lines += 1;
                }
                '\r' => {}
                '\t' => x += space * TAB_WIDTH,
                _ => x += self.resolve(c).map_or(0.0, |g| g.advance),
            }
        }
        Vec2::new(widest.max(x), lines as f32 * self.line_height)
    }
}

/// A font atlas texture together with its glyph geometry.
#[derive(Debug)]
pub struct Font<T> {
    atlas: T,
    geometry: FontGeometry,
}

impl<T> Font<T> {
    pub fn new(atlas: T, geometry: FontGeometry) -> Self {
        Self { atlas, geometry }
    }

    pub fn atlas(&self) -> &T {
        &self.atlas
    }

    pub fn geometry(&self) -> &FontGeometry {
        &self.geometry
    }
}

#[cfg(test)]
pub(crate) fn test_geometry() -> FontGeometry {
    let mut g = FontGeometry::new(1.25);
    g.insert(
        ' ',
        GlyphMetrics {
            advance: 0.25,
            quad: None,
        },
    );
    for (i, c) in ['A', 'B', '?'].into_iter().enumerate() {
        let u = i as f32 * 0.25;
        g.insert(
            c,
            GlyphMetrics {
                advance: 0.5,
                quad: Some(GlyphQuad {
                    plane_min: Vec2::new(0.0, -0.1),
                    plane_max: Vec2::new(0.5, 0.7),
                    uv_min: Vec2::new(u, 0.0),
                    uv_max: Vec2::new(u + 0.25, 0.5),
                }),
            },
        );
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_pen_and_skips_blank_glyphs() {
        let g = test_geometry();
        let quads = g.layout("A B");
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].plane_min.x, 0.0);
        // 0.5 for A, 0.25 for the space.
        assert_eq!(quads[1].plane_min.x, 0.75);
    }

    #[test]
    fn newline_and_tab() {
        let g = test_geometry();
        let quads = g.layout("A\n\tB");
        assert_eq!(quads[1].plane_min, Vec2::new(1.0, -0.1 - 1.25));
    }

    #[test]
    fn unknown_characters_fall_back_to_question_mark() {
        let g = test_geometry();
        let quads = g.layout("é");
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].uv_min.x, 0.5);
    }

    #[test]
    fn measure_reports_widest_line() {
        let g = test_geometry();
        assert_eq!(g.measure("AB\nA"), Vec2::new(1.0, 2.5));
        assert_eq!(g.measure(""), Vec2::new(0.0, 1.25));
    }
}
