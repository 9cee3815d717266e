//! Game configuration
//!
//! Built once at startup (defaults, then an optional JSON file, then the
//! width argument) and passed by reference into the simulation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Environment variable naming an optional JSON settings file
pub const CONFIG_ENV: &str = "TYPER_COMBAT_CONFIG";

/// Enemy variants that can be enabled for spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpponentKind {
    Soldier,
    Copter,
    Ghost,
    Commando,
}

impl OpponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpponentKind::Soldier => "Soldier",
            OpponentKind::Copter => "Copter",
            OpponentKind::Ghost => "Ghost",
            OpponentKind::Commando => "Commando",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soldier" => Some(OpponentKind::Soldier),
            "copter" => Some(OpponentKind::Copter),
            "ghost" => Some(OpponentKind::Ghost),
            "commando" => Some(OpponentKind::Commando),
            _ => None,
        }
    }
}

/// Maximum reach of one jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpLimits {
    pub max_height: f32,
    pub max_width: f32,
}

impl Default for JumpLimits {
    fn default() -> Self {
        Self {
            max_height: MAX_JUMP_HEIGHT,
            max_width: MAX_JUMP_WIDTH,
        }
    }
}

/// Error building settings
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("screen width must be a number, got {0:?}")]
    BadWidth(String),
}

/// Immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen size in world units
    pub screen_width: f32,
    pub screen_height: f32,

    /// Enemy variants the spawner picks from
    pub enabled_opponents: Vec<OpponentKind>,
    /// Concurrent enemy cap
    pub max_enemies: usize,
    /// Concurrent powerup cap
    pub max_powerups: usize,
    /// Full health
    pub max_health: u8,

    /// RNG seed for the whole session
    pub seed: u64,

    /// Optional whitespace-separated word list
    pub word_file: Option<PathBuf>,
    /// Optional JSON overrides for animation sizes and timings
    pub asset_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,

            enabled_opponents: vec![
                OpponentKind::Soldier,
                OpponentKind::Copter,
                OpponentKind::Ghost,
            ],
            max_enemies: MAX_ENEMIES,
            max_powerups: MAX_POWERUPS,
            max_health: MAX_HEALTH,

            seed: 0,

            word_file: None,
            asset_file: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the file named by [`CONFIG_ENV`], or defaults
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Apply the optional screen width argument.
    ///
    /// Widths in 640..=1280 set the screen to `width x 0.75 width`; anything
    /// else resets the screen to the default size. A non-numeric argument is
    /// an error.
    pub fn with_width_arg(mut self, arg: Option<&str>) -> Result<Self, SettingsError> {
        let Some(arg) = arg else {
            return Ok(self);
        };
        let width: i64 = arg
            .trim()
            .parse()
            .map_err(|_| SettingsError::BadWidth(arg.to_string()))?;

        if (MIN_SCREEN_WIDTH as i64..=MAX_SCREEN_WIDTH as i64).contains(&width) {
            self.screen_width = width as f32;
            self.screen_height = width as f32 * SCREEN_ASPECT;
        } else {
            log::warn!(
                "Screen width {} outside {}..={}, using {}x{}",
                width,
                MIN_SCREEN_WIDTH,
                MAX_SCREEN_WIDTH,
                DEFAULT_SCREEN_WIDTH,
                DEFAULT_SCREEN_HEIGHT
            );
            self.screen_width = DEFAULT_SCREEN_WIDTH;
            self.screen_height = DEFAULT_SCREEN_HEIGHT;
        }
        Ok(self)
    }

    /// Maximum reach of one player jump
    pub fn jump_limits(&self) -> JumpLimits {
        JumpLimits::default()
    }

    /// Height of the permanent ground band
    pub fn ground_height(&self) -> i32 {
        (self.screen_height - GROUND_OFFSET).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_arg_sets_aspect() {
        let settings = Settings::default().with_width_arg(Some("1024")).expect("numeric");
        assert_eq!(settings.screen_width, 1024.0);
        assert_eq!(settings.screen_height, 768.0);
    }

    #[test]
    fn test_width_arg_out_of_range_uses_default() {
        let settings = Settings::default().with_width_arg(Some("2000")).expect("numeric");
        assert_eq!(settings.screen_width, 800.0);
        assert_eq!(settings.screen_height, 600.0);

        let settings = Settings::default().with_width_arg(Some("639")).expect("numeric");
        assert_eq!(settings.screen_width, 800.0);
    }

    #[test]
    fn test_width_arg_not_a_number() {
        assert!(matches!(
            Settings::default().with_width_arg(Some("wide")),
            Err(SettingsError::BadWidth(_))
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "seed": 42, "enabled_opponents": ["Ghost", "Commando"] }"#)
                .expect("valid json");
        assert_eq!(settings.seed, 42);
        assert_eq!(
            settings.enabled_opponents,
            vec![OpponentKind::Ghost, OpponentKind::Commando]
        );
        assert_eq!(settings.max_enemies, MAX_ENEMIES);
        assert_eq!(settings.screen_width, DEFAULT_SCREEN_WIDTH);
        assert_eq!(settings.word_file, None);
    }

    #[test]
    fn test_jump_limits_derive_from_physics() {
        let limits = Settings::default().jump_limits();
        assert_eq!(limits.max_height, 90.0);
        assert_eq!(limits.max_width, 18.0);
    }

    #[test]
    fn test_ground_height() {
        assert_eq!(Settings::default().ground_height(), 520);
        let odd = Settings::default().with_width_arg(Some("650")).expect("numeric");
        assert_eq!(odd.ground_height(), 407);
    }

    #[test]
    fn test_opponent_kind_names_round_trip() {
        for kind in [
            OpponentKind::Soldier,
            OpponentKind::Copter,
            OpponentKind::Ghost,
            OpponentKind::Commando,
        ] {
            assert_eq!(OpponentKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
