//! Layer stack: ordered update/render/event handlers with deferred transitions.
//!
//! # Invariants
//! - The stack is never mutated while it is being iterated; replacements are
//!   staged and committed once per frame, after render.
//! - Committing transitions never changes the number of layers.

mod stack;

pub use stack::{BoxedLayer, Layer, LayerCtx, LayerStack};
