//! Typer Combat - a side-scrolling typing-combat arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, level generation, encounters)
//! - `assets`: Animation bounds and frame timings, loaded once at startup
//! - `words`: Word sources for opponents
//! - `settings`: Immutable game configuration

pub mod assets;
pub mod settings;
pub mod sim;
pub mod words;

pub use assets::{AnimKey, AnimSpec, AssetRegistry};
pub use settings::{JumpLimits, Settings};
pub use words::{WordList, WordSource};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default screen size when no width argument is given
    pub const DEFAULT_SCREEN_WIDTH: f32 = 800.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 600.0;
    /// Accepted range for the screen width argument
    pub const MIN_SCREEN_WIDTH: u32 = 640;
    pub const MAX_SCREEN_WIDTH: u32 = 1280;
    /// Screen height is derived from width by this ratio
    pub const SCREEN_ASPECT: f32 = 0.75;

    /// Horizontal player speed (units per tick)
    pub const SPEED: f32 = 2.0;
    /// Bullet travel per tick
    pub const BULLET_SPEED: f32 = 25.0;
    /// Lowest (most negative) vertical velocity reachable by gravity
    pub const TERMINAL_VELOCITY: f32 = -10.0;
    /// Vertical velocity decrement per tick while airborne
    pub const GRAVITY: f32 = 0.25;
    /// Initial upward velocity of a player jump
    pub const JUMP_VELOCITY: f32 = 7.0;
    /// Fall/rise rate used by jump reach math and by soldiers
    pub const JUMP_SPEED: f32 = 2.0;
    /// Frame budget of one jump
    pub const JUMP_FRAMES: u32 = 45;
    /// Minimum stun duration after the player is hit
    pub const HIT_FRAMES: u32 = 10;
    /// Sentinel distance meaning "no surface found"
    pub const BIG_DISTANCE: f32 = 9_999_999.0;

    /// Maximum vertical reach of one jump
    pub const MAX_JUMP_HEIGHT: f32 = SPEED * JUMP_FRAMES as f32;
    /// Maximum horizontal reach of one jump
    pub const MAX_JUMP_WIDTH: f32 = JUMP_SPEED * JUMP_FRAMES as f32 / 5.0;

    /// Concurrent entity caps
    pub const MAX_ENEMIES: usize = 10;
    pub const MAX_POWERUPS: usize = 5;
    pub const MAX_HEALTH: u8 = 5;

    /// Vertical distance between platform bands
    pub const BAND_SPACING: i32 = 80;
    /// Platform thickness
    pub const PLATFORM_THICKNESS: f32 = 16.0;
    /// Platform widths are truncated to a multiple of this
    pub const PLATFORM_WIDTH_STEP: i32 = 16;
    /// The ground box spans the whole world
    pub const GROUND_LEFT: f32 = -10_000.0;
    pub const GROUND_WIDTH: f32 = 20_000.0;
    /// Ground sits this far above the bottom of the first screen
    pub const GROUND_OFFSET: f32 = 80.0;

    /// Word-length divisor for kill score
    pub const SCORE_DIVISOR: f32 = 5.0;
}

/// Signed angle (degrees) of the vertical component of `offset`, in [-90, 90]
#[inline]
pub fn elevation_degrees(offset: Vec2) -> Option<f32> {
    let len = offset.length();
    if len == 0.0 {
        return None;
    }
    Some((offset.y / len).clamp(-1.0, 1.0).asin().to_degrees())
}
