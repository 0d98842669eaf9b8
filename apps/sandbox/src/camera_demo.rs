use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use mamba_app::{AppContext, AppError, Layer, LayerCtx};
use mamba_input::Event;
use mamba_render::{CameraController, CameraInput, Font};
use mamba_render_wgpu::Texture;

const GRID: i32 = 10;
const TILE: f32 = 0.45;
const BACKGROUND: Vec4 = Vec4::new(0.08, 0.08, 0.1, 1.0);

/// Tile color for grid cell `(x, y)`, a gradient across the field.
pub fn tile_color(x: i32, y: i32) -> Vec4 {
    let span = (2 * GRID) as f32;
    Vec4::new(
        (x + GRID) as f32 / span,
        0.4,
        (y + GRID) as f32 / span,
        0.75,
    )
}

/// Pan with WASD or the arrows, zoom with the wheel, over a field of quads,
/// textured quads, circles and a text label.
pub struct CameraLayer {
    controller: CameraController,
    checker: Texture,
    font: Option<Font<Texture>>,
    elapsed: f32,
}

impl CameraLayer {
    pub fn new(ctx: &mut AppContext) -> Result<Self, AppError> {
        let size = ctx.framebuffer_size();
        let font = match ctx.load_font() {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("{e}; camera demo runs without text");
                None
            }
        };
        Ok(Self {
            controller: CameraController::new(size.x / size.y.max(1.0)),
            checker: ctx.load_texture("textures/checkerboard.png"),
            font,
            elapsed: 0.0,
        })
    }
}

impl Layer<AppContext> for CameraLayer {
    fn name(&self) -> &'static str {
        "Camera"
    }

    fn on_update(&mut self, dt: f32, ctx: &mut LayerCtx<'_>) {
        self.elapsed += dt;
        self.controller
            .on_update(dt, CameraInput::from_state(ctx.app.input()));
    }

    fn on_event(&mut self, event: &mut Event, _ctx: &mut LayerCtx<'_>) {
        self.controller.on_event(event);
    }

    fn on_render(&mut self, ctx: &mut LayerCtx<'_>) {
        let renderer = &mut ctx.app.renderer;
        renderer.set_clear_color(BACKGROUND);
        renderer.clear();
        renderer.begin(self.controller.camera());

        for y in -GRID..GRID {
            for x in -GRID..GRID {
                let position = Vec2::new(x as f32, y as f32) * 0.5;
                renderer.draw_rect(position, Vec2::splat(TILE), tile_color(x, y));
            }
        }

        let spin = Mat4::from_scale_rotation_translation(
            Vec3::new(1.5, 1.5, 1.0),
            Quat::from_rotation_z(self.elapsed),
            Vec3::ZERO,
        );
        renderer.draw_quad_textured(spin, &self.checker, Vec4::ONE);
        renderer.draw_rect_textured(
            Vec2::new(-3.0, 2.0),
            Vec2::splat(1.0),
            &self.checker,
            Vec4::new(1.0, 0.8, 0.6, 1.0),
        );

        for (i, thickness) in [1.0, 0.5, 0.1].into_iter().enumerate() {
            let center = Vec3::new(2.0 + i as f32 * 1.2, -2.0, 0.0);
            let transform = Mat4::from_translation(center);
            renderer.draw_circle_with(transform, Vec4::new(1.0, 0.9, 0.2, 1.0), thickness, 0.01);
        }

        if let Some(font) = &self.font {
            renderer.draw_text(
                &format!("zoom {:.2}", self.controller.zoom()),
                font,
                Vec2::new(-4.5, 4.0),
                0.4,
                Vec4::ONE,
            );
        }
        renderer.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_colors_span_the_field() {
        assert_eq!(tile_color(-GRID, -GRID), Vec4::new(0.0, 0.4, 0.0, 0.75));
        assert_eq!(tile_color(0, 0), Vec4::new(0.5, 0.4, 0.5, 0.75));
        let last = tile_color(GRID - 1, GRID - 1);
        assert!(last.x < 1.0 && last.z < 1.0);
    }
}
