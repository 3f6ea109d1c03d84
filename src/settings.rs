//! Playfield and timing configuration
//!
//! Loaded from a JSON file by the host; every field has a default so a
//! partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    /// Playfield width (pixels)
    pub width: f32,
    /// Playfield height (pixels)
    pub height: f32,
    /// Bottom strip reserved for the HUD; the player cannot enter it
    pub hud_margin: f32,
    /// Player spawns this far above the bottom edge
    pub player_start_offset: f32,

    // === Timing ===
    /// Ticks per second (one tick per rendered frame)
    pub fps: u32,
    /// Seconds the lose screen stays up before the run terminates
    pub lose_seconds: u32,
    /// Frames the level banner stays up after a wave starts
    pub banner_ticks: u32,

    // === Rules ===
    /// Each enemy fires on a frame with probability 1/odds (0 = never)
    pub enemy_fire_odds: u32,
    /// Lasers above this y are off-screen (bottom edge is `height`, exclusive)
    pub offscreen_top: f32,

    // === Determinism ===
    /// Seed for the simulation RNG
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            hud_margin: HUD_MARGIN,
            player_start_offset: PLAYER_START_OFFSET,

            fps: FPS,
            lose_seconds: LOSE_SECONDS,
            banner_ticks: BANNER_TICKS,

            enemy_fire_odds: 3 * FPS,
            offscreen_top: 0.0,

            seed: 0x6a72_7564_61,
        }
    }
}

impl GameConfig {
    /// Number of lose-screen ticks before the run terminates
    pub fn lose_ticks(&self) -> u32 {
        self.fps * self.lose_seconds
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SimError::InvalidConfig {
                reason: format!("playfield must be positive, got {}x{}", self.width, self.height),
            });
        }
        if self.fps == 0 {
            return Err(SimError::InvalidConfig {
                reason: "fps must be non-zero".to_string(),
            });
        }
        if self.hud_margin < 0.0 || self.hud_margin >= self.height {
            return Err(SimError::InvalidConfig {
                reason: format!("hud margin {} does not fit the playfield", self.hud_margin),
            });
        }
        Ok(())
    }

    /// Update playfield dimensions (window resize)
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let mut resized = self.clone();
        resized.width = width;
        resized.height = height;
        resized.validate()?;
        *self = resized;
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load config, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Using default config ({}): {}", path.as_ref().display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.fps, 60);
        assert_eq!(config.enemy_fire_odds, 180);
        assert_eq!(config.lose_ticks(), 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "width": 640, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 640.0);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_rejects_zero_fps() {
        let err = GameConfig::from_json(r#"{ "fps": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { .. }));
    }

    #[test]
    fn test_resize_keeps_old_dimensions_on_error() {
        let mut config = GameConfig::default();
        assert!(config.resize(-1.0, 600.0).is_err());
        assert_eq!(config.width, 800.0);
        config.resize(1024.0, 768.0).unwrap();
        assert_eq!((config.width, config.height), (1024.0, 768.0));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = GameConfig::load_or_default("/nonexistent/garuda.json");
        assert_eq!(config, GameConfig::default());
    }
}
