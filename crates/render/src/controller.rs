use crate::camera::OrthographicCamera;
use glam::Vec2;
use mamba_input::{Event, EventKind, InputState, KeyCode};

const ZOOM_STEP: f32 = 0.25;
const MIN_ZOOM: f32 = 0.25;

/// Held movement directions for one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CameraInput {
    /// WASD or arrow keys.
    pub fn from_state(input: &InputState) -> Self {
        Self {
            up: input.any_key_down(&[KeyCode::KeyW, KeyCode::ArrowUp]),
            down: input.any_key_down(&[KeyCode::KeyS, KeyCode::ArrowDown]),
            left: input.any_key_down(&[KeyCode::KeyA, KeyCode::ArrowLeft]),
            right: input.any_key_down(&[KeyCode::KeyD, KeyCode::ArrowRight]),
        }
    }
}

/// Pans an [`OrthographicCamera`] and zooms it with the scroll wheel.
///
/// The visible area is `[-aspect * zoom, aspect * zoom] x [-zoom, zoom]`.
#[derive(Debug, Clone)]
pub struct CameraController {
    aspect_ratio: f32,
    zoom: f32,
    position: Vec2,
    /// World units per second.
    pub speed: f32,
    camera: OrthographicCamera,
}

impl CameraController {
    pub fn new(aspect_ratio: f32) -> Self {
        let zoom = 1.0;
        Self {
            aspect_ratio,
            zoom,
            position: Vec2::ZERO,
            speed: 10.0,
            camera: OrthographicCamera::new(-aspect_ratio * zoom, aspect_ratio * zoom, -zoom, zoom),
        }
    }

    pub fn on_update(&mut self, dt: f32, input: CameraInput) {
        let mut direction = Vec2::ZERO;
        if input.down {
            direction.y -= 1.0;
        }
        if input.up {
            direction.y += 1.0;
        }
        if input.left {
            direction.x -= 1.0;
        }
        if input.right {
            direction.x += 1.0;
        }

        if direction != Vec2::ZERO {
            self.position += direction * self.speed * dt;
            self.camera.set_position(self.position);
        }
    }

    /// React to resize and scroll. Never marks the event handled.
    pub fn on_event(&mut self, event: &Event) {
        match event.kind {
            EventKind::WindowResize { width, height } if width > 0 && height > 0 => {
                self.aspect_ratio = width as f32 / height as f32;
                self.update_projection();
            }
            EventKind::MouseScrolled { y_offset, .. } => {
                self.zoom = (self.zoom - y_offset as f32 * ZOOM_STEP).max(MIN_ZOOM);
                self.update_projection();
            }
            _ => {}
        }
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn update_projection(&mut self) {
        let (a, z) = (self.aspect_ratio, self.zoom);
        self.camera.set_projection(-a * z, a * z, -z, z);
    }
}
