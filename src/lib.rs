//! Tile adventure: a 2D top-down game whose actors are driven by
//! event-based state machines with per-state animations

pub mod animation;
pub mod app;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod input;
pub mod message;
pub mod render;
pub mod util;

pub use app::{window_conf, Game};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use util::asset_path;
