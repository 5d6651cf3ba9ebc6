use macroquad::prelude::*;

use crate::message::Message;

/// Keys the game reacts to
pub const WATCHED_KEYS: [KeyCode; 9] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::RightControl,
    KeyCode::LeftControl,
    KeyCode::Space,
    KeyCode::Key1,
    KeyCode::Escape,
];

/// Snapshot of one key for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub pressed: bool,
    pub released: bool,
    pub down: bool,
}

/// Turns keyboard state into bus messages
pub struct InputHandler {
    keys: Vec<KeyCode>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            keys: WATCHED_KEYS.to_vec(),
        }
    }

    /// Poll macroquad for the watched keys
    pub fn process(&mut self) -> Vec<Message> {
        let mut messages = Vec::new();
        for &key in &self.keys {
            let state = KeyState {
                pressed: is_key_pressed(key),
                released: is_key_released(key),
                down: is_key_down(key),
            };
            messages.extend(key_messages(key, state));
        }
        messages
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Messages for one key: edge events first, then the held state
pub fn key_messages(key: KeyCode, state: KeyState) -> Vec<Message> {
    let mut messages = Vec::new();
    if state.pressed {
        messages.push(Message::KeyPressed(key));
    }
    if state.released {
        messages.push(Message::KeyReleased(key));
    }
    if state.down {
        messages.push(Message::IsKeyPressed(key));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_hold() {
        let messages = key_messages(
            KeyCode::Left,
            KeyState {
                pressed: true,
                released: false,
                down: true,
            },
        );
        assert_eq!(
            messages,
            vec![Message::KeyPressed(KeyCode::Left), Message::IsKeyPressed(KeyCode::Left)]
        );
    }

    #[test]
    fn test_release() {
        let messages = key_messages(
            KeyCode::Space,
            KeyState {
                released: true,
                ..Default::default()
            },
        );
        assert_eq!(messages, vec![Message::KeyReleased(KeyCode::Space)]);
    }

    #[test]
    fn test_idle_key_sends_nothing() {
        assert!(key_messages(KeyCode::Up, KeyState::default()).is_empty());
    }
}
