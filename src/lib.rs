//! Dino Dash - side-scrolling obstacle runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, collisions, round state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, asset loading and raw input polling belong to the host.

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, Round, RoundPhase, TickInput, TickResult};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Obstacle spawn cadence (ms)
    pub const SPAWN_INTERVAL_MS: f32 = 1000.0;
    /// Score cadence (ms per point)
    pub const SCORE_INTERVAL_MS: f32 = 40.0;
    /// Displayed score width (zero-padded)
    pub const SCORE_DIGITS: usize = 7;
    /// Horizontal obstacle speed (units per tick, not per second)
    pub const GAME_SPEED: f32 = 5.0;
    /// Longest frame delta the simulation accepts (ms); bounds catch-up spawns
    pub const MAX_FRAME_MS: f32 = 5.0 * SPAWN_INTERVAL_MS;
    /// Ground texture width; the scroll offset wraps at this length
    pub const GROUND_TILE_WIDTH: f32 = 1000.0;

    /// Gravity while grounded (units/s²)
    pub const BASE_GRAVITY: f32 = 2500.0;
    /// Gravity during a committed double jump (units/s²)
    pub const DOUBLE_JUMP_GRAVITY: f32 = 1000.0;
    /// Gravity once the jump key is released (units/s²)
    pub const FAST_FALL_GRAVITY: f32 = 3300.0;
    /// Launch velocity (negative is up)
    pub const JUMP_VELOCITY: f32 = -1000.0;
    /// Extra velocity added by the double jump
    pub const DOUBLE_JUMP_BOOST: f32 = -100.0;
    /// Jump must be held longer than this to trigger the double jump (ms)
    pub const DOUBLE_JUMP_HOLD_MS: f32 = 250.0;

    /// Player spawn x (left edge of the sprite)
    pub const PLAYER_START_X: f32 = 200.0;
    /// Top of the ground collider
    pub const FLOOR_Y: f32 = 425.0;

    /// Upright hitbox, offset from the player position
    pub const UPRIGHT_HITBOX_OFFSET: (f32, f32) = (22.0, 1.0);
    pub const UPRIGHT_HITBOX_SIZE: (f32, f32) = (44.0, 92.0);
    /// Duck hitbox: bottom-right corner sits at (x + 90, y + 92)
    pub const DUCK_HITBOX_OFFSET: (f32, f32) = (90.0 - 118.0, 92.0 - 56.0);
    pub const DUCK_HITBOX_SIZE: (f32, f32) = (118.0, 56.0);

    /// Obstacle spawn point (top-left corner)
    pub const OBSTACLE_SPAWN: (f32, f32) = (800.0, 340.0);

    /// Default RNG seed
    pub const DEFAULT_SEED: u64 = 0x0D15_EA5E;
}
