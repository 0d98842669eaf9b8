use crate::event::EventKind;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Pixels per scroll line when a touchpad reports pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Translate a winit window event into an [`EventKind`].
///
/// Returns `None` for events the engine does not model (focus, IME, redraw, ...).
pub fn translate(event: &WindowEvent) -> Option<EventKind> {
    match event {
        WindowEvent::CloseRequested => Some(EventKind::WindowClose),
        WindowEvent::Resized(size) => Some(EventKind::WindowResize {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    repeat,
                    ..
                },
            ..
        } => Some(match state {
            ElementState::Pressed => EventKind::KeyPressed {
                key: *key,
                repeat: *repeat,
            },
            ElementState::Released => EventKind::KeyReleased { key: *key },
        }),
        WindowEvent::MouseInput { state, button, .. } => Some(match state {
            ElementState::Pressed => EventKind::MouseButtonPressed { button: *button },
            ElementState::Released => EventKind::MouseButtonReleased { button: *button },
        }),
        WindowEvent::CursorMoved { position, .. } => Some(EventKind::MouseMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let (x_offset, y_offset) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x as f64, *y as f64),
                MouseScrollDelta::PixelDelta(p) => (p.x / PIXELS_PER_LINE, p.y / PIXELS_PER_LINE),
            };
            Some(EventKind::MouseScrolled { x_offset, y_offset })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn close_and_resize() {
        assert_eq!(
            translate(&WindowEvent::CloseRequested),
            Some(EventKind::WindowClose)
        );
        assert_eq!(
            translate(&WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(EventKind::WindowResize {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn unmodelled_events_are_dropped() {
        assert_eq!(translate(&WindowEvent::RedrawRequested), None);
        assert_eq!(translate(&WindowEvent::Focused(true)), None);
    }
}
