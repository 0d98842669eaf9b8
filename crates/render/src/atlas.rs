use crate::text::{FontGeometry, GlyphMetrics, GlyphQuad};
use glam::Vec2;
use rusttype::{Font as TrueTypeFont, Scale, point};
use std::path::{Path, PathBuf};

/// Pixels per em when rasterizing glyphs into the atlas.
pub const EM_PIXELS: f32 = 48.0;
/// Distance in atlas pixels covered by the field on each side of an edge.
pub const SDF_SPREAD: u32 = 6;
const ATLAS_WIDTH: u32 = 512;
const GLYPH_GAP: u32 = 1;
/// Printable ASCII.
const CHARSET: std::ops::Range<u8> = 32..127;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a TrueType/OpenType font")]
    InvalidFontData,
    #[error("font has no glyphs for printable ASCII")]
    NoGlyphs,
}

/// RGBA8 atlas image, rows top to bottom. The distance value is replicated
/// into every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Shelf packer: fills rows left to right, starting a new row when full.
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    width: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl AtlasPacker {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
        }
    }

    /// Top-left corner for a `w` x `h` rectangle. `None` if it is wider than
    /// the atlas.
    pub fn pack(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w > self.width {
            return None;
        }
        if self.cursor_x + w > self.width {
            self.cursor_y += self.row_height + GLYPH_GAP;
            self.cursor_x = 0;
            self.row_height = 0;
        }
        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_GAP;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }

    /// Height used so far.
    pub fn height(&self) -> u32 {
        self.cursor_y + self.row_height
    }
}

/// Brute-force signed distance field of an 8-bit coverage bitmap.
///
/// Output is 128 at the edge, rising to 255 `spread` pixels inside and
/// falling to 0 `spread` pixels outside.
pub fn generate_sdf(coverage: &[u8], width: usize, height: usize, spread: f32) -> Vec<u8> {
    let threshold = 128u8;
    let radius = spread.ceil() as i32;
    let mut out = vec![0u8; width * height];

    for y in 0..height {
        for x in 0..width {
            let inside = coverage[y * width + x] >= threshold;
            let mut nearest = spread;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let other = coverage[ny as usize * width + nx as usize] >= threshold;
                    if other != inside {
                        nearest = nearest.min(((dx * dx + dy * dy) as f32).sqrt());
                    }
                }
            }

            let signed = if inside { nearest } else { -nearest };
            let value = 0.5 + 0.5 * (signed / spread);
            out[y * width + x] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    out
}

struct RasterGlyph {
    c: char,
    advance: f32,
    /// Pixel bounds relative to the pen, y down, including padding.
    min: (i32, i32),
    size: (u32, u32),
    field: Vec<u8>,
}

pub fn load_atlas(path: &Path) -> Result<(AtlasBitmap, FontGeometry), FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    build_atlas(bytes)
}

/// Rasterize printable ASCII from a TrueType font into an SDF atlas.
///
/// Texture coordinates in the returned geometry assume the atlas is
/// uploaded bottom row first, so v grows upward like plane coordinates.
pub fn build_atlas(font_data: Vec<u8>) -> Result<(AtlasBitmap, FontGeometry), FontError> {
    let font = TrueTypeFont::try_from_vec(font_data).ok_or(FontError::InvalidFontData)?;
    let scale = Scale::uniform(EM_PIXELS);
    let v = font.v_metrics(scale);
    let mut geometry = FontGeometry::new((v.ascent - v.descent + v.line_gap) / EM_PIXELS);

    let pad = SDF_SPREAD as i32;
    let mut raster = Vec::new();
    for c in CHARSET.map(char::from) {
        let glyph = font.glyph(c);
        if glyph.id().0 == 0 {
            continue;
        }
        let scaled = glyph.scaled(scale);
        let advance = scaled.h_metrics().advance_width / EM_PIXELS;
        let positioned = scaled.positioned(point(0.0, 0.0));

        let Some(bb) = positioned.pixel_bounding_box() else {
            geometry.insert(c, GlyphMetrics { advance, quad: None });
            continue;
        };
        let w = (bb.width() + 2 * pad) as usize;
        let h = (bb.height() + 2 * pad) as usize;
        let mut coverage = vec![0u8; w * h];
        positioned.draw(|x, y, ink| {
            let idx = (y as usize + SDF_SPREAD as usize) * w + x as usize + SDF_SPREAD as usize;
            coverage[idx] = (ink * 255.0).round() as u8;
        });

        raster.push(RasterGlyph {
            c,
            advance,
            min: (bb.min.x - pad, bb.min.y - pad),
            size: (w as u32, h as u32),
            field: generate_sdf(&coverage, w, h, SDF_SPREAD as f32),
        });
    }

    if raster.is_empty() && geometry.is_empty() {
        return Err(FontError::NoGlyphs);
    }

    let mut packer = AtlasPacker::new(ATLAS_WIDTH);
    let mut placed = Vec::with_capacity(raster.len());
    for g in raster {
        // Glyphs are far narrower than the atlas at this em size.
        let Some(pos) = packer.pack(g.size.0, g.size.1) else {
            tracing::warn!("glyph {:?} does not fit the atlas, skipping", g.c);
            continue;
        };
        placed.push((g, pos));
    }

    let width = ATLAS_WIDTH;
    let height = packer.height().max(1).next_multiple_of(4);
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for (g, (ax, ay)) in placed {
        let (w, h) = g.size;
        for row in 0..h {
            for col in 0..w {
                let value = g.field[(row * w + col) as usize];
                let dst = (((ay + row) * width + ax + col) * 4) as usize;
                pixels[dst..dst + 4].fill(value);
            }
        }

        let (wf, hf) = (w as f32, h as f32);
        let plane_min = Vec2::new(g.min.0 as f32, -(g.min.1 as f32 + hf)) / EM_PIXELS;
        let plane_max = Vec2::new(g.min.0 as f32 + wf, -(g.min.1 as f32)) / EM_PIXELS;
        let uv_min = Vec2::new(
            ax as f32 / width as f32,
            1.0 - (ay + h) as f32 / height as f32,
        );
        let uv_max = Vec2::new((ax + w) as f32 / width as f32, 1.0 - ay as f32 / height as f32);

        geometry.insert(
            g.c,
            GlyphMetrics {
                advance: g.advance,
                quad: Some(GlyphQuad {
                    plane_min,
                    plane_max,
                    uv_min,
                    uv_max,
                }),
            },
        );
    }

    tracing::debug!(
        "built {width}x{height} font atlas with {} glyphs",
        geometry.len()
    );
    Ok((
        AtlasBitmap {
            width,
            height,
            pixels,
        },
        geometry,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sdf_of_filled_square() {
        // 12x12 with a 4x4 filled block in the middle.
        let (w, h) = (12, 12);
        let mut coverage = vec![0u8; w * h];
        for y in 4..8 {
            for x in 4..8 {
                coverage[y * w + x] = 255;
            }
        }
        let field = generate_sdf(&coverage, w, h, 4.0);

        // Inside the block is above the edge value, outside below.
        assert!(field[5 * w + 5] > 128);
        assert!(field[5 * w + 2] < 128);
        // Far corner saturates to fully outside.
        assert_eq!(field[0], 0);
        // Distance falls off monotonically moving away from the block.
        assert!(field[5 * w + 3] > field[5 * w + 2]);
        assert!(field[5 * w + 2] > field[5 * w + 1]);
    }

    #[test]
    fn packer_wraps_rows() {
        let mut p = AtlasPacker::new(10);
        assert_eq!(p.pack(6, 3), Some((0, 0)));
        assert_eq!(p.pack(6, 5), Some((0, 4)));
        assert_eq!(p.pack(3, 2), Some((7, 4)));
        assert_eq!(p.height(), 9);
        assert_eq!(p.pack(11, 1), None);
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_atlas(&dir.path().join("nope.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();
        let err = load_atlas(file.path()).unwrap_err();
        assert!(matches!(err, FontError::InvalidFontData));
    }
}
