//! Messages exchanged between input, entities and the game loop

pub mod bus;

use macroquad::input::KeyCode;

pub use bus::MessageBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    KeyPressed,
    KeyReleased,
    IsKeyPressed,
    GameOver,
    CloseWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Key went down this frame
    KeyPressed(KeyCode),
    /// Key went up this frame
    KeyReleased(KeyCode),
    /// Key is held down (sent every frame)
    IsKeyPressed(KeyCode),
    GameOver,
    CloseWindow,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::KeyPressed(_) => MessageType::KeyPressed,
            Message::KeyReleased(_) => MessageType::KeyReleased,
            Message::IsKeyPressed(_) => MessageType::IsKeyPressed,
            Message::GameOver => MessageType::GameOver,
            Message::CloseWindow => MessageType::CloseWindow,
        }
    }
}
