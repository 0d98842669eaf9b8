//! Batched 2D renderer: quads, circles and SDF text.
//!
//! # Invariants
//! - A batch never references more than [`MAX_TEXTURE_SLOTS`] textures or
//!   more than [`MAX_QUADS_PER_BATCH`] primitives per vertex list; running out
//!   of either flushes and continues with the triggering primitive.
//! - Empty batches are never submitted.
//! - The batching protocol is backend-agnostic; GPU work lives behind
//!   [`RenderBackend`].

pub mod atlas;
pub mod batch;
pub mod camera;
pub mod controller;
pub mod recording;
mod renderer;
pub mod text;

pub use atlas::FontError;
pub use batch::{
    Batch, CircleVertex, MAX_QUADS_PER_BATCH, MAX_TEXTURE_SLOTS, MAX_VERTICES, QuadVertex,
    TextVertex, TextureId,
};
pub use camera::OrthographicCamera;
pub use controller::{CameraController, CameraInput};
pub use renderer::{
    DEFAULT_FADE, FILLED, RenderBackend, Renderer2D, RendererStats, TextureHandle,
};
pub use text::{Font, FontGeometry, GlyphMetrics, GlyphQuad};
