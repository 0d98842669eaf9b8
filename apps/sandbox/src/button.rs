use crate::colors::{Color, ColorLayer};
use glam::{Mat4, Quat, Vec2, Vec4};
use mamba_app::{AppContext, AppError, Layer, LayerCtx};
use mamba_input::{Event, EventKind};
use mamba_render::OrthographicCamera;
use mamba_render_wgpu::Texture;

const BUTTON_SIZE: Vec2 = Vec2::new(256.0, 96.0);
const ROTATION_DEGREES: f32 = 10.0;
const HOVER_TINT: Vec4 = Vec4::new(0.75, 0.75, 0.75, 1.0);

/// Whether a cursor at `mouse` (pixels, y down) is over the button centered
/// at `center` (pixels, y up). The rotation is ignored.
pub fn is_hovered(mouse: Vec2, framebuffer: Vec2, center: Vec2, size: Vec2) -> bool {
    let cursor = Vec2::new(mouse.x, framebuffer.y - mouse.y);
    let (min, max) = (center - size / 2.0, center + size / 2.0);
    cursor.x >= min.x && cursor.x <= max.x && cursor.y >= min.y && cursor.y <= max.y
}

/// A textured button that swaps the color layer below it when clicked.
pub struct ButtonLayer {
    texture: Texture,
    camera: OrthographicCamera,
    position: Vec2,
    hovered: bool,
}

impl ButtonLayer {
    pub fn new(ctx: &mut AppContext) -> Result<Self, AppError> {
        let size = ctx.framebuffer_size();
        Ok(Self {
            texture: ctx.load_texture("textures/button.png"),
            camera: OrthographicCamera::from_size(size.x, size.y),
            position: size / 2.0,
            hovered: false,
        })
    }
}

impl Layer<AppContext> for ButtonLayer {
    fn name(&self) -> &'static str {
        "Button"
    }

    fn on_update(&mut self, _dt: f32, ctx: &mut LayerCtx<'_>) {
        let size = ctx.app.framebuffer_size();
        self.camera.set_size(size.x, size.y);
        self.position = size / 2.0;
        self.hovered = is_hovered(ctx.app.mouse_position(), size, self.position, BUTTON_SIZE);
    }

    fn on_event(&mut self, event: &mut Event, ctx: &mut LayerCtx<'_>) {
        if !matches!(event.kind, EventKind::MouseButtonPressed { .. }) || !self.hovered {
            return;
        }
        let swapped = [Color::Red, Color::Green, Color::Blue]
            .into_iter()
            .find(|c| ctx.replace(c.layer_name(), ColorLayer::new(c.next())));
        match swapped {
            Some(c) => tracing::info!("button: {} -> {}", c.layer_name(), c.next().layer_name()),
            None => tracing::warn!("button: no color layer to replace"),
        }
        event.handled = true;
    }

    fn on_render(&mut self, ctx: &mut LayerCtx<'_>) {
        let renderer = &mut ctx.app.renderer;
        let transform = Mat4::from_scale_rotation_translation(
            BUTTON_SIZE.extend(1.0),
            Quat::from_rotation_z(ROTATION_DEGREES.to_radians()),
            self.position.extend(0.0),
        );
        let tint = if self.hovered { HOVER_TINT } else { Vec4::ONE };

        renderer.begin(&self.camera);
        renderer.draw_quad_textured(transform, &self.texture, tint);
        renderer.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FB: Vec2 = Vec2::new(800.0, 600.0);
    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    #[test]
    fn hover_flips_y() {
        let size = Vec2::new(200.0, 100.0);
        // Top-left origin: y = 260 is 340 from the bottom, inside 250..350.
        assert!(is_hovered(Vec2::new(400.0, 260.0), FB, CENTER, size));
        // 50 pixels from the top is 550 from the bottom.
        assert!(!is_hovered(Vec2::new(400.0, 50.0), FB, CENTER, size));
    }

    #[test]
    fn hover_edges_are_inclusive() {
        let size = Vec2::new(200.0, 100.0);
        assert!(is_hovered(Vec2::new(300.0, 350.0), FB, CENTER, size));
        assert!(is_hovered(Vec2::new(500.0, 250.0), FB, CENTER, size));
        assert!(!is_hovered(Vec2::new(500.1, 300.0), FB, CENTER, size));
    }
}
