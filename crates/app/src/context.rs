use crate::config::AppSpecification;
use crate::error::AppError;
use glam::{UVec2, Vec2};
use mamba_input::{InputState, KeyCode, MouseButton};
use mamba_render::{Font, Renderer2D};
use mamba_render_wgpu::{Texture, WgpuBackend, load_font};
use std::path::Path;
use std::sync::Arc;

/// What layers see of the running application.
pub struct AppContext {
    pub renderer: Renderer2D<WgpuBackend>,
    input: InputState,
    spec: AppSpecification,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    framebuffer_size: UVec2,
    exit_requested: bool,
    /// Keeps the renderer's fallback texture alive.
    _white: Texture,
}

impl AppContext {
    pub(crate) fn new(
        spec: AppSpecification,
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        renderer: Renderer2D<WgpuBackend>,
        white: Texture,
        framebuffer_size: UVec2,
    ) -> Self {
        Self {
            renderer,
            input: InputState::new(),
            spec,
            device,
            queue,
            framebuffer_size,
            exit_requested: false,
            _white: white,
        }
    }

    pub fn spec(&self) -> &AppSpecification {
        &self.spec
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.input.is_key_down(key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.input.is_button_down(button)
    }

    /// Cursor in physical pixels, origin top-left, y down.
    pub fn mouse_position(&self) -> Vec2 {
        self.input.mouse_position()
    }

    /// Framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> Vec2 {
        self.framebuffer_size.as_vec2()
    }

    pub(crate) fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_size = UVec2::new(width, height);
    }

    /// Stop the frame loop after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Load a texture relative to the assets directory. Failures are logged
    /// and yield a white texture.
    pub fn load_texture(&self, path: impl AsRef<Path>) -> Texture {
        let path = self.spec.asset_path(path);
        Texture::load_or_white(&self.device, &self.queue, &path)
    }

    /// Load the configured font, or the first one found on the system.
    pub fn load_font(&self) -> Result<Font<Texture>, AppError> {
        let path = self.spec.resolve_font().ok_or(AppError::NoFont)?;
        Ok(load_font(&self.device, &self.queue, &path)?)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
