//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod anim;
pub mod camera;
pub mod collision;
pub mod controller;
pub mod geom;
pub mod input;
pub mod level;
pub mod opponent;
pub mod player;
pub mod powerup;
pub mod reach;
pub mod score;
pub mod state;
pub mod tick;
pub mod word;

pub use anim::{AnimView, Facing};
pub use camera::Camera;
pub use collision::{distance_to_surface_above, distance_to_surface_below, has_clear_shot};
pub use geom::Rect;
pub use input::KeyEvent;
pub use level::{LevelGenerator, Platform, PlatformLook};
pub use opponent::{ActiveOpponent, Opponent};
pub use player::{Player, PlayerState, Weapon};
pub use powerup::{Powerup, PowerupKind};
pub use reach::is_reachable;
pub use score::{Health, Score};
pub use state::{EntityId, GamePhase, GameState, SimRng, Snapshot};
pub use tick::{TickInput, tick};
pub use word::{SpecialCharPool, Word};
