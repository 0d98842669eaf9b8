use egui::Context as EguiContext;
use mamba_render::RendererStats;
use std::collections::VecDeque;
use std::time::Instant;
use winit::event::WindowEvent;
use winit::window::Window;

/// Longest step handed to layers; longer gaps (debugger, window drag) are clamped.
const MAX_FRAME_TIME: f32 = 0.1;
const SAMPLES: usize = 60;

/// Frame delta source with a rolling average for display.
#[derive(Debug)]
pub struct FrameTimer {
    last: Instant,
    samples: VecDeque<f32>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(last: Instant) -> Self {
        Self {
            last,
            samples: VecDeque::with_capacity(SAMPLES),
        }
    }

    /// Seconds since the previous tick, clamped.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.record(dt);
        dt.min(MAX_FRAME_TIME)
    }

    fn record(&mut self, dt: f32) {
        if self.samples.len() == SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    /// Mean of the recent unclamped frame times, in seconds.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot shown by the overlay.
pub struct FrameInfo<'a> {
    pub frame_time: f32,
    pub stats: RendererStats,
    pub layers: &'a [&'static str],
}

/// egui window with frame timing, renderer counters and the layer stack.
pub struct DebugOverlay {
    visible: bool,
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = EguiContext::default();
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1, false);
        Self {
            visible: false,
            ctx,
            winit,
            renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::debug!("debug overlay {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Feed a window event to egui. True if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        if !routes_to_egui(self.visible, event) {
            return false;
        }
        let response = self.winit.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// Draw the overlay on top of `view`. While hidden this only drains
    /// egui's pending input.
    pub fn render(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        info: &FrameInfo<'_>,
    ) {
        let raw_input = self.winit.take_egui_input(window);
        if !self.visible {
            return;
        }
        let full_output = self.ctx.run(raw_input, |ctx| draw(ctx, info));
        self.winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Input only reaches egui while the overlay is shown; window state changes
/// always do, so the first visible frame has the right size and focus.
fn routes_to_egui(visible: bool, event: &WindowEvent) -> bool {
    visible
        || matches!(
            event,
            WindowEvent::Resized(_)
                | WindowEvent::ScaleFactorChanged { .. }
                | WindowEvent::Focused(_)
        )
}

fn draw(ctx: &EguiContext, info: &FrameInfo<'_>) {
    egui::Window::new("Mamba")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let ms = info.frame_time * 1000.0;
            let fps = if info.frame_time > 0.0 {
                1.0 / info.frame_time
            } else {
                0.0
            };
            ui.label(format!("Frame: {ms:.2} ms ({fps:.0} fps)"));
            ui.separator();

            ui.heading("Renderer");
            ui.label(format!("Draw calls: {}", info.stats.draw_calls));
            ui.label(format!("Quads: {}", info.stats.quads));
            ui.label(format!("Circles: {}", info.stats.circles));
            ui.label(format!("Glyphs: {}", info.stats.glyphs));
            ui.separator();

            ui.heading("Layers");
            for (i, name) in info.layers.iter().enumerate() {
                ui.label(format!("{i}: {name}"));
            }
            ui.separator();
            ui.small("F1: Toggle overlay");
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    #[test]
    fn tick_clamps_long_frames() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        let dt = timer.tick_at(start + Duration::from_millis(500));
        assert_eq!(dt, MAX_FRAME_TIME);
        // The average reflects what actually happened.
        assert!((timer.average() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn average_is_rolling() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        assert_eq!(timer.average(), 0.0);

        let mut now = start;
        for _ in 0..SAMPLES {
            now += Duration::from_millis(40);
            timer.tick_at(now);
        }
        for _ in 0..SAMPLES {
            now += Duration::from_millis(10);
            timer.tick_at(now);
        }
        assert!((timer.average() - 0.010).abs() < 1e-4);
    }

    #[test]
    fn hidden_overlay_only_tracks_window_state() {
        let resized = WindowEvent::Resized(PhysicalSize::new(640, 480));
        let moved = WindowEvent::Moved(PhysicalPosition::new(10, 20));
        let focused = WindowEvent::Focused(true);

        assert!(routes_to_egui(false, &resized));
        assert!(routes_to_egui(false, &focused));
        assert!(!routes_to_egui(false, &moved));
        assert!(!routes_to_egui(false, &WindowEvent::CloseRequested));
        assert!(!routes_to_egui(false, &WindowEvent::RedrawRequested));

        assert!(routes_to_egui(true, &moved));
        assert!(routes_to_egui(true, &WindowEvent::CloseRequested));
    }
}
