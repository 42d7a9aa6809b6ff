use std::collections::HashSet;

use crate::math::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for a single window.
///
/// Holds which keys are down and whether the window has focus.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused. Raw mouse motion is ignored while unfocused.
    pub focused: bool,

    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Releases are not delivered to an unfocused window.
                    self.keys_down.clear();
                }
            }

            InputEvent::MouseMotion { dx, dy } => {
                if self.focused {
                    frame.mouse_delta += Vec2::new(dx, dy);
                }
            }

            InputEvent::Key { key, state } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

}
