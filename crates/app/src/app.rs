use crate::config::AppSpecification;
use crate::context::AppContext;
use crate::error::AppError;
use crate::overlay::{DebugOverlay, FrameInfo, FrameTimer};
use glam::UVec2;
use mamba_input::{Event, EventKind, KeyCode, translate};
use mamba_layer::{BoxedLayer, Layer, LayerStack};
use mamba_render::Renderer2D;
use mamba_render_wgpu::{ShaderSources, Texture, WgpuBackend};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

type LayerFactory = Box<dyn FnOnce(&mut AppContext) -> Result<BoxedLayer<AppContext>, AppError>>;

/// A window with a layer stack driven by a single-threaded frame loop.
///
/// Each frame: dispatch input events, update layers, render layers, apply
/// pending layer transitions, draw the debug overlay, present.
pub struct App {
    spec: AppSpecification,
    factories: Vec<LayerFactory>,
    running: Option<Running>,
    error: Option<AppError>,
}

impl App {
    pub fn new(spec: AppSpecification) -> Self {
        Self {
            spec,
            factories: Vec::new(),
            running: None,
            error: None,
        }
    }

    /// Add a layer on top of the stack. `factory` runs once the GPU is up,
    /// so layers can load textures and fonts while being built.
    pub fn push_layer<L, F>(&mut self, factory: F) -> &mut Self
    where
        L: Layer<AppContext>,
        F: FnOnce(&mut AppContext) -> Result<L, AppError> + 'static,
    {
        self.factories.push(Box::new(move |ctx| {
            let layer: BoxedLayer<AppContext> = Box::new(factory(ctx)?);
            Ok(layer)
        }));
        self
    }

    /// Open the window and run until it is closed or a layer asks to exit.
    pub fn run(mut self) -> Result<(), AppError> {
        self.spec.validate()?;
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        let factories = std::mem::take(&mut self.factories);
        match Running::start(event_loop, self.spec.clone(), factories) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };
        if running.overlay.on_window_event(&running.window, &event) {
            return;
        }

        match &event {
            WindowEvent::Resized(size) => running.resize(*size),
            WindowEvent::Focused(false) => running.ctx.input_mut().release_all(),
            WindowEvent::RedrawRequested => running.frame(),
            _ => {}
        }

        if let Some(kind) = translate(&event) {
            running.dispatch(kind);
        }
        if running.ctx.exit_requested() {
            tracing::info!("exiting");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

struct Running {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: AppContext,
    layers: LayerStack<AppContext>,
    overlay: DebugOverlay,
    timer: FrameTimer,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        spec: AppSpecification,
        factories: Vec<LayerFactory>,
    ) -> Result<Self, AppError> {
        let attrs = Window::default_attributes()
            .with_title(spec.title.clone())
            .with_inner_size(PhysicalSize::new(spec.width, spec.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(AppError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("mamba_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if spec.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            "GPU initialized with {} backend ({})",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name
        );

        let shaders = ShaderSources::load(spec.shader_dir.as_deref());
        let white = Texture::white(&device, &queue);
        let backend = WgpuBackend::new(
            device.clone(),
            queue.clone(),
            surface_format,
            &shaders,
            &white,
        );
        let renderer = Renderer2D::new(backend, &white);
        let overlay = DebugOverlay::new(&window, &device, surface_format);

        let mut ctx = AppContext::new(
            spec,
            device,
            queue,
            renderer,
            white,
            UVec2::new(size.width, size.height),
        );
        let mut layers = LayerStack::new();
        for factory in factories {
            layers.push_boxed(factory(&mut ctx)?);
        }
        tracing::info!("started with layers {:?}", layers.names());

        Ok(Self {
            window,
            surface,
            config,
            ctx,
            layers,
            overlay,
            timer: FrameTimer::new(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(self.ctx.device(), &self.config);
        self.ctx.set_framebuffer_size(size.width, size.height);
    }

    fn dispatch(&mut self, kind: EventKind) {
        self.ctx.input_mut().apply(&kind);
        if let EventKind::KeyPressed {
            key: KeyCode::F1,
            repeat: false,
        } = kind
        {
            self.overlay.toggle();
        }

        let mut event = Event::new(kind);
        self.layers.dispatch(&mut event, &mut self.ctx);

        if kind == EventKind::WindowClose {
            self.ctx.request_exit();
        }
    }

    fn frame(&mut self) {
        let dt = self.timer.tick();
        self.layers.update(dt, &mut self.ctx);

        let size = self.ctx.framebuffer_size();
        if size.x < 1.0 || size.y < 1.0 {
            // Minimized.
            self.layers.apply_pending_transitions();
            return;
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => Some(t),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(self.ctx.device(), &self.config);
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        };

        if let Some(output) = &output {
            let view = output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let renderer = &mut self.ctx.renderer;
            renderer.reset_stats();
            renderer.backend_mut().begin_frame(view);
            renderer.set_viewport(self.config.width, self.config.height);
            renderer.clear();
            self.layers.render(&mut self.ctx);
            self.ctx.renderer.backend_mut().end_frame();
        }

        self.layers.apply_pending_transitions();

        let Some(output) = output else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let info = FrameInfo {
            frame_time: self.timer.average(),
            stats: self.ctx.renderer.stats(),
            layers: self.layers.names(),
        };
        self.overlay.render(
            &self.window,
            self.ctx.device(),
            self.ctx.queue(),
            &view,
            [self.config.width, self.config.height],
            &info,
        );
        output.present();
    }
}
