//! Window and input events: the typed event model layers consume.
//!
//! # Invariants
//! - Layers only ever see [`Event`], never raw winit events.
//! - [`InputState`] is updated before an event is dispatched, so polled state
//!   and the event agree.

pub mod event;
pub mod state;
pub mod translate;

pub use event::{Event, EventKind, EventType};
pub use state::InputState;
pub use translate::translate;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
