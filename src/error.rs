//! Error types for the game engine

use thiserror::Error;

use crate::entity::{EntityId, StateType};

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// A transition targeted a state the entity never registered
    #[error("entity {entity}: state {state:?} is not registered")]
    UnknownState { entity: EntityId, state: StateType },

    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("map error: {0}")]
    Map(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GameError::UnknownState { entity: 7, state: StateType::Attack };
        assert_eq!(error.to_string(), "entity 7: state Attack is not registered");

        let error = GameError::UnknownEntityType("Dragon".to_string());
        assert_eq!(error.to_string(), "unknown entity type: Dragon");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let error: GameError = parse.unwrap_err().into();
        assert!(matches!(error, GameError::Json(_)));
    }
}
