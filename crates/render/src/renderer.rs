use crate::batch::{Batch, CircleVertex, MAX_VERTICES, QuadVertex, TextVertex, TextureId};
use crate::camera::OrthographicCamera;
use crate::text::Font;
use glam::{Mat4, Vec2, Vec4};

const QUAD_POSITIONS: [Vec4; 4] = [
    Vec4::new(-0.5, -0.5, 0.0, 1.0),
    Vec4::new(0.5, -0.5, 0.0, 1.0),
    Vec4::new(0.5, 0.5, 0.0, 1.0),
    Vec4::new(-0.5, 0.5, 0.0, 1.0),
];
const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const CIRCLE_LOCAL: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Ring thickness of a filled circle.
pub const FILLED: f32 = 1.0;
pub const DEFAULT_FADE: f32 = 0.005;

/// A texture the renderer can bind into a slot.
pub trait TextureHandle {
    /// What the backend needs to sample the texture.
    type Binding: Clone;

    fn id(&self) -> TextureId;

    fn binding(&self) -> Self::Binding;
}

/// Target of [`Renderer2D`] flushes.
///
/// Calls arrive in submission order; a backend must apply them in that order.
pub trait RenderBackend {
    type Binding: Clone;

    fn set_view_projection(&mut self, view_projection: Mat4);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn clear(&mut self, color: Vec4);

    /// Draw quads, then circles, then text. Never called with an empty batch.
    fn draw_batch(&mut self, batch: &Batch<Self::Binding>);
}

/// Counters accumulated across flushes until [`Renderer2D::reset_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    pub draw_calls: u32,
    pub quads: u32,
    pub circles: u32,
    pub glyphs: u32,
}

/// Batched immediate-mode 2D renderer.
///
/// Draw calls between [`Self::begin`] and [`Self::end`] accumulate vertices
/// and texture slots; the batch is handed to the backend when a vertex list
/// or the slot table is full, and once more at `end`.
pub struct Renderer2D<B: RenderBackend> {
    backend: B,
    batch: Batch<B::Binding>,
    white: (TextureId, B::Binding),
    clear_color: Vec4,
    stats: RendererStats,
    in_scene: bool,
}

impl<B: RenderBackend> Renderer2D<B> {
    /// `white` is the 1x1 texture untextured quads sample.
    pub fn new<T>(backend: B, white: &T) -> Self
    where
        T: TextureHandle<Binding = B::Binding>,
    {
        Self {
            backend,
            batch: Batch::new(),
            white: (white.id(), white.binding()),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            stats: RendererStats::default(),
            in_scene: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn begin(&mut self, camera: &OrthographicCamera) {
        if self.in_scene {
            tracing::warn!("begin called inside a scene; flushing the open batch");
            self.flush();
        }
        self.backend.set_view_projection(camera.view_projection());
        self.batch.clear();
        self.in_scene = true;
    }

    pub fn end(&mut self) {
        if !self.in_scene {
            tracing::warn!("end called without begin");
        }
        self.flush();
        self.batch.clear();
        self.in_scene = false;
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    /// Clear the target to the clear color. Geometry drawn earlier in the
    /// scene is flushed first so it is not reordered past the clear.
    pub fn clear(&mut self) {
        if self.in_scene {
            self.next_batch();
        }
        self.backend.clear(self.clear_color);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.backend.set_viewport(width, height);
    }

    pub fn stats(&self) -> RendererStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RendererStats::default();
    }

    /// Untextured quad: a unit square centered on the origin under `transform`.
    pub fn draw_quad(&mut self, transform: Mat4, color: Vec4) {
        let (id, binding) = self.white.clone();
        self.push_quad(transform, id, binding, color);
    }

    pub fn draw_quad_textured<T>(&mut self, transform: Mat4, texture: &T, tint: Vec4)
    where
        T: TextureHandle<Binding = B::Binding>,
    {
        self.push_quad(transform, texture.id(), texture.binding(), tint);
    }

    /// Axis-aligned quad centered on `position`.
    pub fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Vec4) {
        self.draw_quad(rect_transform(position, size), color);
    }

    pub fn draw_rect_textured<T>(&mut self, position: Vec2, size: Vec2, texture: &T, tint: Vec4)
    where
        T: TextureHandle<Binding = B::Binding>,
    {
        self.draw_quad_textured(rect_transform(position, size), texture, tint);
    }

    /// Filled circle inscribed in the transformed unit square.
    pub fn draw_circle(&mut self, transform: Mat4, color: Vec4) {
        self.draw_circle_with(transform, color, FILLED, DEFAULT_FADE);
    }

    /// `thickness` is the ring width as a fraction of the radius (1 fills);
    /// `fade` is the width of the anti-aliased edge in the same units.
    pub fn draw_circle_with(&mut self, transform: Mat4, color: Vec4, thickness: f32, fade: f32) {
        if !self.accepting("circle") {
            return;
        }
        if self.batch.circles.len() + 4 > MAX_VERTICES {
            self.next_batch();
        }
        for (corner, local) in QUAD_POSITIONS.iter().zip(CIRCLE_LOCAL) {
            self.batch.circles.push(CircleVertex {
                world_position: (transform * *corner).to_array(),
                local_position: local,
                color: color.to_array(),
                thickness,
                fade,
            });
        }
    }

    /// Draw `text` with its first baseline starting at `position`, `size`
    /// world units per em.
    pub fn draw_text<T>(&mut self, text: &str, font: &Font<T>, position: Vec2, size: f32, color: Vec4)
    where
        T: TextureHandle<Binding = B::Binding>,
    {
        if !self.accepting("text") {
            return;
        }
        let atlas = font.atlas();
        for glyph in font.geometry().layout(text) {
            if self.batch.text.len() + 4 > MAX_VERTICES {
                self.next_batch();
            }
            self.bind_atlas(atlas.id(), || atlas.binding());

            let min = position + glyph.plane_min * size;
            let max = position + glyph.plane_max * size;
            let corners = [
                (Vec2::new(min.x, min.y), [glyph.uv_min.x, glyph.uv_min.y]),
                (Vec2::new(max.x, min.y), [glyph.uv_max.x, glyph.uv_min.y]),
                (Vec2::new(max.x, max.y), [glyph.uv_max.x, glyph.uv_max.y]),
                (Vec2::new(min.x, max.y), [glyph.uv_min.x, glyph.uv_max.y]),
            ];
            for (p, uv) in corners {
                self.batch.text.push(TextVertex {
                    position: [p.x, p.y, 0.0, 1.0],
                    tex_coords: uv,
                    color: color.to_array(),
                });
            }
        }
    }

    /// Submit the current batch to the backend, if it has any geometry.
    pub fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let (quads, circles, glyphs) = (
            self.batch.quad_count(),
            self.batch.circle_count(),
            self.batch.glyph_count(),
        );
        tracing::trace!(
            "flush: {quads} quads, {circles} circles, {glyphs} glyphs, {} textures",
            self.batch.textures.len()
        );
        self.backend.draw_batch(&self.batch);
        self.stats.draw_calls += 1;
        self.stats.quads += quads as u32;
        self.stats.circles += circles as u32;
        self.stats.glyphs += glyphs as u32;
    }

    /// Flush and start an empty batch.
    pub fn next_batch(&mut self) {
        self.flush();
        self.batch.clear();
    }

    fn accepting(&self, what: &str) -> bool {
        if !self.in_scene {
            tracing::warn!("{what} drawn outside begin/end, dropped");
        }
        self.in_scene
    }

    fn push_quad(&mut self, transform: Mat4, id: TextureId, binding: B::Binding, color: Vec4) {
        if !self.accepting("quad") {
            return;
        }
        if self.batch.quads.len() + 4 > MAX_VERTICES {
            self.next_batch();
        }
        let tex_index = self.texture_slot(id, binding);
        for (corner, tex_coords) in QUAD_POSITIONS.iter().zip(QUAD_TEX_COORDS) {
            self.batch.quads.push(QuadVertex {
                position: (transform * *corner).to_array(),
                tex_coords,
                color: color.to_array(),
                tex_index,
            });
        }
    }

    fn texture_slot(&mut self, id: TextureId, binding: B::Binding) -> u32 {
        let mut binding = binding;
        loop {
            match self.batch.textures.insert(id, binding) {
                Ok(slot) => return slot,
                Err(returned) => {
                    tracing::debug!("texture slots full, starting a new batch");
                    binding = returned;
                    self.next_batch();
                }
            }
        }
    }

    fn bind_atlas(&mut self, id: TextureId, binding: impl FnOnce() -> B::Binding) {
        let bound = self.batch.text_atlas.as_ref().map(|(bound, _)| *bound);
        match bound {
            Some(bound) if bound == id => return,
            Some(_) => self.next_batch(),
            None => {}
        }
        self.batch.text_atlas = Some((id, binding()));
    }
}

fn rect_transform(position: Vec2, size: Vec2) -> Mat4 {
    Mat4::from_translation(position.extend(0.0)) * Mat4::from_scale(size.extend(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{MAX_QUADS_PER_BATCH, MAX_TEXTURE_SLOTS};
    use crate::recording::{Command, RecordedTexture, RecordingBackend};
    use crate::text::test_geometry;

    fn renderer() -> Renderer2D<RecordingBackend> {
        Renderer2D::new(RecordingBackend::default(), &RecordedTexture::new(1, 1))
    }

    fn camera() -> OrthographicCamera {
        OrthographicCamera::from_size(800.0, 600.0)
    }

    const WHITE: Vec4 = Vec4::ONE;

    #[test]
    fn empty_scene_submits_nothing() {
        let mut r = renderer();
        r.begin(&camera());
        r.end();
        assert_eq!(r.backend().batches().count(), 0);
        assert_eq!(r.stats().draw_calls, 0);
    }

    #[test]
    fn begin_uploads_view_projection() {
        let mut r = renderer();
        let cam = camera();
        r.begin(&cam);
        r.end();
        assert_eq!(
            r.backend().commands[0],
            Command::ViewProjection(cam.view_projection())
        );
    }

    #[test]
    fn quad_vertices_follow_corner_order() {
        let mut r = renderer();
        r.begin(&camera());
        r.draw_rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0), WHITE);
        r.end();

        let batch = r.backend().batches().next().unwrap();
        let xy: Vec<[f32; 2]> = batch
            .quads
            .iter()
            .map(|v| [v.position[0], v.position[1]])
            .collect();
        assert_eq!(xy, [[8.0, 19.0], [12.0, 19.0], [12.0, 21.0], [8.0, 21.0]]);
        let uv: Vec<[f32; 2]> = batch.quads.iter().map(|v| v.tex_coords).collect();
        assert_eq!(uv, QUAD_TEX_COORDS);
    }

    #[test]
    fn quad_overflow_flushes_without_losing_primitives() {
        let mut r = renderer();
        let total = MAX_QUADS_PER_BATCH * 2 + 17;
        r.begin(&camera());
        for i in 0..total {
            r.draw_rect(Vec2::splat(i as f32), Vec2::ONE, WHITE);
        }
        r.end();

        let counts: Vec<usize> = r.backend().batches().map(|b| b.quad_count()).collect();
        assert_eq!(counts, [MAX_QUADS_PER_BATCH, MAX_QUADS_PER_BATCH, 17]);
        assert_eq!(r.stats().quads as usize, total);
        assert_eq!(r.stats().draw_calls, 3);
    }

    #[test]
    fn circle_overflow_flushes_without_losing_primitives() {
        let mut r = renderer();
        let total = MAX_QUADS_PER_BATCH + 1;
        r.begin(&camera());
        for _ in 0..total {
            r.draw_circle(Mat4::IDENTITY, WHITE);
        }
        r.end();

        let drawn: usize = r.backend().batches().map(|b| b.circle_count()).sum();
        assert_eq!(drawn, total);
        assert_eq!(r.backend().batches().count(), 2);
    }

    #[test]
    fn same_texture_uses_one_slot() {
        let mut r = renderer();
        let tex = RecordedTexture::new(8, 8);
        r.begin(&camera());
        for _ in 0..100 {
            r.draw_quad_textured(Mat4::IDENTITY, &tex, WHITE);
        }
        r.end();

        let batch = r.backend().batches().next().unwrap();
        assert_eq!(batch.textures.len(), 1);
        assert!(batch.quads.iter().all(|v| v.tex_index == 0));
    }

    #[test]
    fn untextured_quads_share_the_white_slot() {
        let mut r = renderer();
        let tex = RecordedTexture::new(8, 8);
        r.begin(&camera());
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.draw_quad_textured(Mat4::IDENTITY, &tex, WHITE);
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.end();

        let batch = r.backend().batches().next().unwrap();
        let slots: Vec<u32> = batch.quads.iter().step_by(4).map(|v| v.tex_index).collect();
        assert_eq!(slots, [0, 1, 0]);
    }

    #[test]
    fn seventeenth_texture_starts_a_new_batch() {
        let mut r = renderer();
        let textures: Vec<_> = (0..=MAX_TEXTURE_SLOTS)
            .map(|_| RecordedTexture::new(2, 2))
            .collect();
        r.begin(&camera());
        for t in &textures {
            r.draw_quad_textured(Mat4::IDENTITY, t, WHITE);
        }
        r.end();

        let batches: Vec<_> = r.backend().batches().collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].textures.len(), MAX_TEXTURE_SLOTS);
        assert_eq!(batches[0].quad_count(), MAX_TEXTURE_SLOTS);
        // The triggering quad lands in slot 0 of the fresh batch.
        assert_eq!(batches[1].quad_count(), 1);
        assert_eq!(batches[1].quads[0].tex_index, 0);
        assert_eq!(
            batches[1].textures.ids().next(),
            Some(textures[MAX_TEXTURE_SLOTS].id())
        );
    }

    #[test]
    fn text_emits_one_quad_per_visible_glyph() {
        let mut r = renderer();
        let font = Font::new(RecordedTexture::new(64, 64), test_geometry());
        r.begin(&camera());
        r.draw_text("AB A", &font, Vec2::new(100.0, 50.0), 10.0, WHITE);
        r.end();

        let batch = r.backend().batches().next().unwrap();
        assert_eq!(batch.glyph_count(), 3);
        assert_eq!(batch.text_atlas.as_ref().map(|a| a.0), Some(font.atlas().id()));
        // First glyph: plane (0, -0.1)..(0.5, 0.7) scaled by 10 from the pen.
        assert_eq!(batch.text[0].position[..2], [100.0, 49.0]);
        assert_eq!(batch.text[2].position[..2], [105.0, 57.0]);
    }

    #[test]
    fn different_atlas_forces_flush() {
        let mut r = renderer();
        let a = Font::new(RecordedTexture::new(64, 64), test_geometry());
        let b = Font::new(RecordedTexture::new(64, 64), test_geometry());
        r.begin(&camera());
        r.draw_text("A", &a, Vec2::ZERO, 1.0, WHITE);
        r.draw_text("A", &a, Vec2::ZERO, 1.0, WHITE);
        r.draw_text("B", &b, Vec2::ZERO, 1.0, WHITE);
        r.end();

        let glyphs: Vec<usize> = r.backend().batches().map(|b| b.glyph_count()).collect();
        assert_eq!(glyphs, [2, 1]);
    }

    #[test]
    fn draws_outside_scene_are_dropped() {
        let mut r = renderer();
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.draw_circle(Mat4::IDENTITY, WHITE);
        r.begin(&camera());
        r.end();
        assert_eq!(r.backend().batches().count(), 0);
    }

    #[test]
    fn clear_inside_scene_keeps_order() {
        let mut r = renderer();
        r.set_clear_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        r.begin(&camera());
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.clear();
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.end();

        let kinds: Vec<&str> = r
            .backend()
            .commands
            .iter()
            .map(|c| match c {
                Command::ViewProjection(_) => "vp",
                Command::Viewport(..) => "viewport",
                Command::Clear(_) => "clear",
                Command::DrawBatch(_) => "draw",
            })
            .collect();
        assert_eq!(kinds, ["vp", "draw", "clear", "draw"]);
    }

    #[test]
    fn stats_reset() {
        let mut r = renderer();
        r.begin(&camera());
        r.draw_quad(Mat4::IDENTITY, WHITE);
        r.draw_circle(Mat4::IDENTITY, WHITE);
        r.end();
        assert_eq!(
            r.stats(),
            RendererStats {
                draw_calls: 1,
                quads: 1,
                circles: 1,
                glyphs: 0
            }
        );
        r.reset_stats();
        assert_eq!(r.stats(), RendererStats::default());
    }
}
