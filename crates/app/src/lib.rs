//! Application shell: window, GPU surface, renderer, layer stack and the
//! frame loop that drives them.
//!
//! # Invariants
//! - Input state is updated before the event reaches any layer.
//! - Layer transitions requested during a frame take effect after that
//!   frame's render pass, never mid-iteration.
//! - A failed startup (window, adapter, device, font) ends the event loop and
//!   is returned from [`App::run`].

mod app;
pub mod config;
mod context;
mod error;
pub mod overlay;

pub use app::App;
pub use config::{AppArgs, AppSpecification, ConfigError};
pub use context::AppContext;
pub use error::AppError;

/// Layer stack types specialized to [`AppContext`].
pub type LayerCtx<'a> = mamba_layer::LayerCtx<'a, AppContext>;
pub use mamba_layer::Layer;
