//! Game state and core simulation types
//!
//! Everything a round needs lives in `GameState`; the host never mutates it
//! directly and only sees `TickResult` snapshots.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

/// Top-level round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Active gameplay
    Running,
    /// Player hit an obstacle; world is frozen until restart
    GameOver,
}

/// Logical player state (derived from physics + input each tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Jumping,
    DoubleJumping,
    Ducking,
    /// Terminal marker set on game over
    Hurt,
}

/// The runner
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left of the upright sprite
    pub pos: Vec2,
    /// Vertical velocity (negative is up, units/s)
    pub velocity_y: f32,
    /// Current gravity (units/s²), switched by input every tick
    pub gravity: f32,
    pub on_floor: bool,
    /// Double jump consumed during this airborne phase
    pub double_jump_used: bool,
    /// Duck body visible instead of the upright one
    pub ducking: bool,
    pub hurt: bool,
}

impl Player {
    /// Fresh player resting on the floor
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x, Self::rest_y(tuning)),
            velocity_y: 0.0,
            gravity: tuning.base_gravity,
            on_floor: true,
            double_jump_used: false,
            ducking: false,
            hurt: false,
        }
    }

    /// Position y at which the upright hitbox sits on the floor
    pub fn rest_y(tuning: &Tuning) -> f32 {
        tuning.floor_y - tuning.upright_hitbox.offset.y - tuning.upright_hitbox.size.y
    }

    pub fn upright_hitbox(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.pos + tuning.upright_hitbox.offset, tuning.upright_hitbox.size)
    }

    /// Duck hitbox follows the upright position with a constant offset
    pub fn duck_hitbox(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.pos + tuning.duck_hitbox.offset, tuning.duck_hitbox.size)
    }

    /// Hitbox of the body currently shown
    pub fn visible_hitbox(&self, tuning: &Tuning) -> Rect {
        if self.ducking {
            self.duck_hitbox(tuning)
        } else {
            self.upright_hitbox(tuning)
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.hurt {
            PlayerState::Hurt
        } else if self.ducking {
            PlayerState::Ducking
        } else if self.on_floor {
            PlayerState::Grounded
        } else if self.double_jump_used {
            PlayerState::DoubleJumping
        } else {
            PlayerState::Jumping
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Kind identifier from the tuning obstacle table
    pub kind: u8,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Things that happened during a tick (for audio/effects on the host side)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    Jumped,
    DoubleJumped,
    ObstacleSpawned { id: u32, kind: u8, pos: Vec2 },
    ObstacleDespawned { id: u32 },
    GameOver { score: u64, obstacle_id: u32 },
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: RoundPhase,
    pub player: Player,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    /// Spawn accumulator (ms), always in [0, spawn_interval) after a tick
    pub spawn_timer_ms: f32,
    /// Score accumulator (ms)
    pub score_timer_ms: f32,
    /// Ground texture scroll, advances with game speed
    pub ground_offset: f32,
    /// Running ticks simulated this round
    pub time_ticks: u64,
    /// Events raised since the last tick started
    pub events: Vec<GameEvent>,
    /// Obstacle kind RNG; not reset between rounds
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        let rng = Pcg32::seed_from_u64(tuning.seed);
        let player = Player::new(&tuning);
        let mut state = Self {
            tuning,
            phase: RoundPhase::Running,
            player,
            obstacles: Vec::new(),
            score: 0,
            spawn_timer_ms: 0.0,
            score_timer_ms: 0.0,
            ground_offset: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            rng,
            next_id: 1,
        };
        state.events.push(GameEvent::RoundStarted);
        state
    }

    /// Re-enter Running with a fresh player, no obstacles and zeroed timers
    pub fn reset(&mut self) {
        self.phase = RoundPhase::Running;
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.spawn_timer_ms = 0.0;
        self.score_timer_ms = 0.0;
        self.ground_offset = 0.0;
        self.time_ticks = 0;
        self.next_id = 1;
        self.events.push(GameEvent::RoundStarted);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_on_floor() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert!(player.on_floor);
        assert_eq!(player.state(), PlayerState::Grounded);
        assert_eq!(player.upright_hitbox(&tuning).bottom(), tuning.floor_y);
    }

    #[test]
    fn test_duck_hitbox_tracks_position() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let before = player.duck_hitbox(&tuning);

        player.pos += Vec2::new(0.0, -50.0);
        let after = player.duck_hitbox(&tuning);
        assert_eq!(after.min - before.min, Vec2::new(0.0, -50.0));

        // Bottom-right corner sits at (x + 90, y + 92)
        assert_eq!(after.right(), player.pos.x + 90.0);
        assert_eq!(after.bottom(), player.pos.y + 92.0);
    }

    #[test]
    fn test_state_priority() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.on_floor = false;
        assert_eq!(player.state(), PlayerState::Jumping);
        player.double_jump_used = true;
        assert_eq!(player.state(), PlayerState::DoubleJumping);
        player.ducking = true;
        assert_eq!(player.state(), PlayerState::Ducking);
        player.hurt = true;
        assert_eq!(player.state(), PlayerState::Hurt);
    }

    #[test]
    fn test_reset_clears_round() {
        let mut state = GameState::new(Tuning::default());
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: 1,
            pos: Vec2::new(100.0, 340.0),
            size: Vec2::new(34.0, 70.0),
        });
        state.score = 99;
        state.spawn_timer_ms = 500.0;
        state.phase = RoundPhase::GameOver;
        state.player.hurt = true;
        state.events.clear();

        state.reset();
        assert!(state.is_running());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert_eq!(state.player, Player::new(&state.tuning));
        assert_eq!(state.events, vec![GameEvent::RoundStarted]);
    }
}
