//! Game tuning
//!
//! Every gameplay constant lives here so it can be tweaked from a JSON file
//! without rebuilding. Missing fields fall back to their defaults.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BLOCK_SIZE, MAX_SUBSTEPS, UPDATE_HZ};
use crate::error::SettingsError;

/// World-level physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Force applied to massed bodies every tick (y grows downward)
    pub gravity: Vec2,
    /// Tile edge in world units
    pub block_size: f32,
    /// Fixed simulation ticks per second
    pub update_hz: u32,
    /// Cap on ticks run for one rendered frame
    pub max_substeps: u32,
    /// Brochette speed in world units per tick
    pub brochette_speed: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 1.0),
            block_size: DEFAULT_BLOCK_SIZE,
            update_hz: UPDATE_HZ,
            max_substeps: MAX_SUBSTEPS,
            brochette_speed: 5.0,
        }
    }
}

/// Player controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Hitbox size
    pub size: Vec2,
    pub max_velocity: Vec2,
    pub walk_force: f32,
    pub run_force: f32,
    /// Horizontal drag proportional to speed (caps ground speed)
    pub feet_friction: f32,
    /// Ticks it takes to stop once no direction is held
    pub frames_to_still: f32,
    pub jump_force: f32,
    /// Grace window in ticks for jumps and wall contact
    pub input_tolerance: u32,
    /// Share of gravity cancelled while the jump key is held
    pub jump_gravity_factor: f32,
    /// Share of gravity cancelled while sliding down a wall
    pub wall_slide_gravity: f32,
    /// Ticks the wall holds the player when pushing away from it
    pub wall_sticky_frames: u32,
    /// Ticks the player blinks after respawning
    pub respawn_blink: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(57.0, 52.0),
            max_velocity: Vec2::new(16.0, 16.0),
            walk_force: 1.0,
            run_force: 2.0,
            feet_friction: 0.1,
            frames_to_still: 2.0,
            jump_force: 10.0,
            input_tolerance: 2,
            jump_gravity_factor: 0.7,
            wall_slide_gravity: 0.8,
            wall_sticky_frames: 15,
            respawn_blink: 50,
        }
    }
}

/// All tuning, persisted as one JSON document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Seconds per simulation tick
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.physics.update_hz.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "physics": { "gravity": [0.0, 2.0] } }"#).unwrap();
        assert_eq!(settings.physics.gravity, Vec2::new(0.0, 2.0));
        assert_eq!(settings.physics.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(settings.player, PlayerTuning::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ physics: "),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("llama_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.player.jump_force = 12.5;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_tick_seconds() {
        let settings = Settings::default();
        assert!((settings.tick_seconds() - 1.0 / 60.0).abs() < 1e-6);
    }
}
