//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta supplied by the host, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod player;
pub mod rect;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{check_collision, first_hit};
pub use player::update_player;
pub use rect::Rect;
pub use score::{format_score, update_score};
pub use spawner::{spawn_obstacle, update_obstacles};
pub use state::{GameEvent, GameState, Obstacle, Player, PlayerState, RoundPhase};
pub use tick::{ObstaclePose, PlayerPose, Round, TickInput, TickResult, sanitize_delta, tick};
