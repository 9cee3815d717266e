//! Asset registry
//!
//! Sprite bounds and frame timings for every animation, built once at
//! startup and handed to entity constructors by reference. Images are the
//! renderer's business; the simulation only needs the sizes (they become
//! collision rectangles) and the timings (they become death timers).

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifies one animation strip. Left/right mirrored strips share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimKey {
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerFall,
    PlayerHit,
    PlayerAimUp,
    PlayerAimUpSide,
    PlayerAimSide,
    PlayerAimDownSide,
    PlayerAimDown,
    SoldierRun,
    SoldierJump,
    SoldierFall,
    CopterFly,
    GhostLeft,
    GhostRight,
    GhostUp,
    GhostDown,
    GhostStunned,
    GhostEyesLeft,
    GhostEyesRight,
    GhostEyesUp,
    GhostEyesDown,
    CommandoIdle,
    Explosion,
    Heart,
    Shotgun,
}

/// Size and timing of one animation strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimSpec {
    /// Bounding size of the largest frame
    pub size: Vec2,
    /// Ticks each frame stays on screen
    pub frame_ticks: Vec<u32>,
    /// One-shot animations stop on their last frame
    #[serde(default)]
    pub ends: bool,
}

impl AnimSpec {
    fn looping(w: f32, h: f32, frame_ticks: &[u32]) -> Self {
        Self {
            size: Vec2::new(w, h),
            frame_ticks: frame_ticks.to_vec(),
            ends: false,
        }
    }

    fn one_shot(w: f32, h: f32, frame_ticks: &[u32]) -> Self {
        Self {
            ends: true,
            ..Self::looping(w, h, frame_ticks)
        }
    }

    /// Ticks until a one-shot animation finishes (ignoring start delay)
    pub fn duration(&self) -> u32 {
        self.frame_ticks.iter().sum()
    }
}

/// Error loading registry overrides
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid asset table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("animation {0:?} has no frames")]
    EmptyAnimation(AnimKey),
}

/// All animation specs, keyed by [`AnimKey`]
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    specs: HashMap<AnimKey, AnimSpec>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssetRegistry {
    /// Built-in table matching the shipped sprite sheets
    pub fn builtin() -> Self {
        use AnimKey::*;

        let explosion_ticks = [4u32; 10];
        let specs = HashMap::from([
            (PlayerIdle, AnimSpec::looping(32.0, 38.0, &[30, 60])),
            (PlayerRun, AnimSpec::looping(34.0, 38.0, &[14; 6])),
            (PlayerJump, AnimSpec::looping(30.0, 36.0, &[20, 40])),
            (PlayerFall, AnimSpec::looping(30.0, 38.0, &[20])),
            (PlayerHit, AnimSpec::looping(34.0, 36.0, &[5, 5])),
            (PlayerAimUp, AnimSpec::looping(28.0, 44.0, &[5, 5])),
            (PlayerAimUpSide, AnimSpec::looping(34.0, 40.0, &[5, 5])),
            (PlayerAimSide, AnimSpec::looping(40.0, 38.0, &[5, 5])),
            (PlayerAimDownSide, AnimSpec::looping(34.0, 38.0, &[5, 5])),
            (PlayerAimDown, AnimSpec::looping(28.0, 38.0, &[5, 5])),
            (SoldierRun, AnimSpec::looping(26.0, 36.0, &[15; 4])),
            (SoldierJump, AnimSpec::looping(26.0, 26.0, &[5, 5])),
            (SoldierFall, AnimSpec::looping(26.0, 36.0, &[20, 400])),
            (CopterFly, AnimSpec::looping(40.0, 30.0, &[10; 6])),
            (GhostLeft, AnimSpec::looping(28.0, 28.0, &[10, 10])),
            (GhostRight, AnimSpec::looping(28.0, 28.0, &[10, 10])),
            (GhostUp, AnimSpec::looping(28.0, 28.0, &[10, 10])),
            (GhostDown, AnimSpec::looping(28.0, 28.0, &[10, 10])),
            (GhostStunned, AnimSpec::looping(28.0, 28.0, &[10, 10])),
            (GhostEyesLeft, AnimSpec::looping(20.0, 10.0, &[100])),
            (GhostEyesRight, AnimSpec::looping(20.0, 10.0, &[100])),
            (GhostEyesUp, AnimSpec::looping(20.0, 10.0, &[100])),
            (GhostEyesDown, AnimSpec::looping(20.0, 10.0, &[100])),
            (CommandoIdle, AnimSpec::looping(32.0, 35.0, &[30, 60])),
            (Explosion, AnimSpec::one_shot(32.0, 32.0, &explosion_ticks)),
            (Heart, AnimSpec::looping(16.0, 16.0, &[5; 8])),
            (Shotgun, AnimSpec::looping(28.0, 12.0, &[200])),
        ]);
        Self { specs }
    }

    /// Built-in table with entries replaced by a JSON object of
    /// `{ "<AnimKey>": { "size": [w, h], "frame_ticks": [...], "ends": bool } }`
    pub fn with_overrides(json: &str) -> Result<Self, AssetError> {
        let overrides: HashMap<AnimKey, AnimSpec> = serde_json::from_str(json)?;
        let mut registry = Self::builtin();
        for (key, spec) in overrides {
            if spec.frame_ticks.is_empty() || spec.frame_ticks.contains(&0) {
                return Err(AssetError::EmptyAnimation(key));
            }
            registry.specs.insert(key, spec);
        }
        Ok(registry)
    }

    /// Load overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::with_overrides(&json)?;
        log::info!("Loaded asset overrides from {}", path.display());
        Ok(registry)
    }

    /// Spec for `key`. Every key is present in the built-in table.
    pub fn spec(&self, key: AnimKey) -> AnimSpec {
        self.specs
            .get(&key)
            .cloned()
            .unwrap_or_else(|| AnimSpec::looping(16.0, 16.0, &[1]))
    }

    /// Bounding size for `key`
    pub fn size(&self, key: AnimKey) -> Vec2 {
        self.specs.get(&key).map(|s| s.size).unwrap_or(Vec2::splat(16.0))
    }
}
