use std::fmt;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Fieldless discriminant of an [`EventKind`], for cheap filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    WindowClose,
    WindowResize,
    KeyPressed,
    KeyReleased,
    MouseButtonPressed,
    MouseButtonReleased,
    MouseMoved,
    MouseScrolled,
}

impl EventType {
    pub fn name(self) -> &'static str {
        match self {
            Self::WindowClose => "WindowClose",
            Self::WindowResize => "WindowResize",
            Self::KeyPressed => "KeyPressed",
            Self::KeyReleased => "KeyReleased",
            Self::MouseButtonPressed => "MouseButtonPressed",
            Self::MouseButtonReleased => "MouseButtonReleased",
            Self::MouseMoved => "MouseMoved",
            Self::MouseScrolled => "MouseScrolled",
        }
    }
}

/// Payload of a window or input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// The user asked to close the window.
    WindowClose,
    /// Framebuffer was resized, in physical pixels.
    WindowResize { width: u32, height: u32 },
    KeyPressed { key: KeyCode, repeat: bool },
    KeyReleased { key: KeyCode },
    MouseButtonPressed { button: MouseButton },
    MouseButtonReleased { button: MouseButton },
    /// Cursor position in physical pixels, origin top-left, y down.
    MouseMoved { x: f64, y: f64 },
    /// Scroll offset in lines.
    MouseScrolled { x_offset: f64, y_offset: f64 },
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::WindowClose => EventType::WindowClose,
            Self::WindowResize { .. } => EventType::WindowResize,
            Self::KeyPressed { .. } => EventType::KeyPressed,
            Self::KeyReleased { .. } => EventType::KeyReleased,
            Self::MouseButtonPressed { .. } => EventType::MouseButtonPressed,
            Self::MouseButtonReleased { .. } => EventType::MouseButtonReleased,
            Self::MouseMoved { .. } => EventType::MouseMoved,
            Self::MouseScrolled { .. } => EventType::MouseScrolled,
        }
    }
}

/// An event travelling through the layer stack.
///
/// Dispatch is front-to-back and stops at the first layer that sets `handled`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub handled: bool,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            handled: false,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type() == event_type
    }

    /// Mark the event as consumed so later layers never see it.
    pub fn consume(&mut self) {
        self.handled = true;
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::WindowClose => write!(f, "WindowClosedEvent"),
            EventKind::WindowResize { width, height } => {
                write!(f, "WindowResizeEvent: {width}, {height}")
            }
            EventKind::KeyPressed { key, repeat } => {
                write!(f, "KeyPressedEvent: {key:?} (repeat={repeat})")
            }
            EventKind::KeyReleased { key } => write!(f, "KeyReleasedEvent: {key:?}"),
            EventKind::MouseButtonPressed { button } => {
                write!(f, "MouseButtonPressedEvent: {button:?}")
            }
            EventKind::MouseButtonReleased { button } => {
                write!(f, "MouseButtonReleasedEvent: {button:?}")
            }
            EventKind::MouseMoved { x, y } => write!(f, "MouseMovedEvent: {x}, {y}"),
            EventKind::MouseScrolled { x_offset, y_offset } => {
                write!(f, "MouseScrolledEvent: {x_offset}, {y_offset}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_is_unhandled() {
        let e = Event::new(EventKind::WindowClose);
        assert!(!e.handled);
        assert_eq!(e.event_type(), EventType::WindowClose);
    }

    #[test]
    fn consume_marks_handled() {
        let mut e = Event::from(EventKind::MouseButtonPressed {
            button: MouseButton::Left,
        });
        e.consume();
        assert!(e.handled);
        assert!(e.is(EventType::MouseButtonPressed));
    }

    #[test]
    fn display_matches_event_kind() {
        let e = Event::new(EventKind::WindowResize {
            width: 800,
            height: 600,
        });
        assert_eq!(e.to_string(), "WindowResizeEvent: 800, 600");

        let e = Event::new(EventKind::KeyPressed {
            key: KeyCode::Space,
            repeat: true,
        });
        assert_eq!(e.to_string(), "KeyPressedEvent: Space (repeat=true)");
    }

    #[test]
    fn event_type_names() {
        assert_eq!(EventType::MouseScrolled.name(), "MouseScrolled");
        assert_eq!(
            EventKind::MouseMoved { x: 1.0, y: 2.0 }.event_type().name(),
            "MouseMoved"
        );
    }
}
