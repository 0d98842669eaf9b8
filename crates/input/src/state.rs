use crate::event::EventKind;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Polled input state, kept current by feeding it every translated event.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_held: HashSet<KeyCode>,
    buttons_held: HashSet<MouseButton>,
    mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the state. Events that carry no input are ignored.
    pub fn apply(&mut self, kind: &EventKind) {
        match *kind {
            EventKind::KeyPressed { key, .. } => {
                self.keys_held.insert(key);
            }
            EventKind::KeyReleased { key } => {
                self.keys_held.remove(&key);
            }
            EventKind::MouseButtonPressed { button } => {
                self.buttons_held.insert(button);
            }
            EventKind::MouseButtonReleased { button } => {
                self.buttons_held.remove(&button);
            }
            EventKind::MouseMoved { x, y } => {
                self.mouse_position = Vec2::new(x as f32, y as f32);
            }
            EventKind::WindowClose
            | EventKind::WindowResize { .. }
            | EventKind::MouseScrolled { .. } => {}
        }
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// True when any of `keys` is held.
    pub fn any_key_down(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_held.contains(k))
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    /// Cursor position in physical pixels, origin top-left, y down.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Forget held keys and buttons, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.buttons_held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_and_release() {
        let mut s = InputState::new();
        s.apply(&EventKind::KeyPressed {
            key: KeyCode::KeyA,
            repeat: false,
        });
        assert!(s.is_key_down(KeyCode::KeyA));
        assert!(s.any_key_down(&[KeyCode::ArrowLeft, KeyCode::KeyA]));

        s.apply(&EventKind::KeyReleased { key: KeyCode::KeyA });
        assert!(!s.is_key_down(KeyCode::KeyA));
    }

    #[test]
    fn mouse_tracking() {
        let mut s = InputState::new();
        s.apply(&EventKind::MouseMoved { x: 12.5, y: 40.0 });
        assert_eq!(s.mouse_position(), Vec2::new(12.5, 40.0));

        s.apply(&EventKind::MouseButtonPressed {
            button: MouseButton::Left,
        });
        assert!(s.is_button_down(MouseButton::Left));
        s.release_all();
        assert!(!s.is_button_down(MouseButton::Left));
    }

    #[test]
    fn non_input_events_are_ignored() {
        let mut s = InputState::new();
        s.apply(&EventKind::WindowResize {
            width: 10,
            height: 10,
        });
        s.apply(&EventKind::MouseScrolled {
            x_offset: 0.0,
            y_offset: 1.0,
        });
        assert_eq!(s.mouse_position(), Vec2::ZERO);
    }
}
