//! Game settings, read from a TOML file at startup

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GameError, Result};
use crate::util::asset_path;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "TILE_ADVENTURE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "assets/game.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    /// Tiled JSON map loaded at startup
    pub map_path: String,
    /// Sprite sheet manifest
    pub sheets_path: String,
    /// Walking speed in pixels per second
    pub std_velocity: f32,
    /// Seconds each animation frame is shown
    pub switch_time: f32,
    pub debug_colliders: bool,
    pub zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile Adventure".to_string(),
            window_width: 1024,
            window_height: 768,
            map_path: "assets/maps/meadow.json".to_string(),
            sheets_path: "assets/sheets.toml".to_string(),
            std_velocity: 120.0,
            switch_time: 0.1,
            debug_colliders: false,
            zoom: 2.0,
        }
    }
}

impl GameConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from `$TILE_ADVENTURE_CONFIG` or `assets/game.toml`, falling back
    /// to defaults when the file is missing or broken
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| asset_path(DEFAULT_CONFIG_PATH));
        match Self::load_from(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}: {})", path, e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(GameError::Config(format!(
                "window size {}x{} must be positive",
                self.window_width, self.window_height
            )));
        }
        if self.zoom <= 0.0 {
            return Err(GameError::Config(format!("zoom {} must be positive", self.zoom)));
        }
        if self.switch_time < 0.0 {
            return Err(GameError::Config(format!("switch_time {} is negative", self.switch_time)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GameConfig::from_toml("std_velocity = 80.0\ndebug_colliders = true\n").unwrap();
        assert_eq!(config.std_velocity, 80.0);
        assert!(config.debug_colliders);
        assert_eq!(config.switch_time, 0.1);
        assert_eq!(config.map_path, "assets/maps/meadow.json");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("game.toml");

        let toml_content = r#"
window_title = "Meadow"
window_width = 640
window_height = 480
zoom = 3.0
"#;
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = GameConfig::load_from(&path).unwrap();
        assert_eq!(config.window_title, "Meadow");
        assert_eq!(config.window_width, 640);
        assert_eq!(config.zoom, 3.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = GameConfig::load_from(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(GameError::Io(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(GameConfig::from_toml("zoom = 0.0"), Err(GameError::Config(_))));
        assert!(matches!(GameConfig::from_toml("window_width = -5"), Err(GameError::Config(_))));
        assert!(matches!(GameConfig::from_toml("zoom = \"big\""), Err(GameError::Toml(_))));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = GameConfig::from_toml(include_str!("../assets/game.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
