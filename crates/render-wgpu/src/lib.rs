//! wgpu backend for [`mamba_render::Renderer2D`].
//!
//! Owns the three pipelines (quads, circles, SDF text), their vertex buffers
//! and the shared quad index buffer, plus texture and font uploads.
//!
//! # Invariants
//! - A flushed batch is drawn in one pass: quads, then circles, then text.
//! - Texture slots a batch does not use are bound to the white texture.
//! - Images are uploaded bottom row first, so v = 0 is the image bottom.
//! - Shader overrides that fail to read or compile fall back to the built-ins.

mod backend;
pub mod buffer;
mod font;
pub mod shader;
mod shaders;
pub mod texture;

pub use backend::WgpuBackend;
pub use font::{FontLoadError, load_font};
pub use shader::{Shader, ShaderError, ShaderKind, ShaderSources};
pub use texture::{ColorSpace, Texture, TextureError};
