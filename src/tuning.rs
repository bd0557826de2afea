//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a host can override
//! it from JSON. Missing fields fall back to the defaults in `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tuning value: {field} {reason}")]
    Invalid { field: String, reason: String },
}

impl TuningError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A fixed-size rectangle anchored to an owner position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxSpec {
    /// Offset of the top-left corner from the owner position
    pub offset: Vec2,
    pub size: Vec2,
}

/// One entry of the obstacle table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Discrete kind identifier (the host binds assets to it)
    pub kind: u8,
    pub name: String,
    pub size: Vec2,
}

impl ObstacleSpec {
    fn new(kind: u8, name: &str, w: f32, h: f32) -> Self {
        Self {
            kind,
            name: name.to_string(),
            size: Vec2::new(w, h),
        }
    }
}

/// Default obstacle table: six cacti and a bird, all spawned at the same height
pub fn default_obstacles() -> Vec<ObstacleSpec> {
    vec![
        ObstacleSpec::new(1, "cactus_small_single", 34.0, 70.0),
        ObstacleSpec::new(2, "cactus_small_double", 68.0, 70.0),
        ObstacleSpec::new(3, "cactus_small_triple", 102.0, 70.0),
        ObstacleSpec::new(4, "cactus_large_single", 50.0, 85.0),
        ObstacleSpec::new(5, "cactus_large_double", 100.0, 85.0),
        ObstacleSpec::new(6, "cactus_large_triple", 150.0, 85.0),
        ObstacleSpec::new(7, "bird", 34.0, 24.0),
    ]
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    pub spawn_interval_ms: f32,
    pub score_interval_ms: f32,
    pub game_speed: f32,
    /// Frame deltas above this are clamped
    pub max_frame_ms: f32,

    // === Player physics ===
    pub base_gravity: f32,
    pub double_jump_gravity: f32,
    pub fast_fall_gravity: f32,
    pub jump_velocity: f32,
    pub double_jump_boost: f32,
    pub double_jump_hold_ms: f32,

    // === Geometry ===
    pub player_start_x: f32,
    pub floor_y: f32,
    pub ground_tile_width: f32,
    pub upright_hitbox: HitboxSpec,
    pub duck_hitbox: HitboxSpec,
    pub obstacle_spawn: Vec2,
    pub obstacles: Vec<ObstacleSpec>,

    // === Rules ===
    /// Only test the hitbox that is currently visible (both are tested by default)
    pub collide_visible_hitbox_only: bool,
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            score_interval_ms: SCORE_INTERVAL_MS,
            game_speed: GAME_SPEED,
            max_frame_ms: MAX_FRAME_MS,

            base_gravity: BASE_GRAVITY,
            double_jump_gravity: DOUBLE_JUMP_GRAVITY,
            fast_fall_gravity: FAST_FALL_GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            double_jump_boost: DOUBLE_JUMP_BOOST,
            double_jump_hold_ms: DOUBLE_JUMP_HOLD_MS,

            player_start_x: PLAYER_START_X,
            floor_y: FLOOR_Y,
            ground_tile_width: GROUND_TILE_WIDTH,
            upright_hitbox: HitboxSpec {
                offset: UPRIGHT_HITBOX_OFFSET.into(),
                size: UPRIGHT_HITBOX_SIZE.into(),
            },
            duck_hitbox: HitboxSpec {
                offset: DUCK_HITBOX_OFFSET.into(),
                size: DUCK_HITBOX_SIZE.into(),
            },
            obstacle_spawn: OBSTACLE_SPAWN.into(),
            obstacles: default_obstacles(),

            collide_visible_hitbox_only: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} obstacle kinds)", tuning.obstacles.len());
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        positive("score_interval_ms", self.score_interval_ms)?;
        non_negative("game_speed", self.game_speed)?;
        positive("max_frame_ms", self.max_frame_ms)?;
        positive("ground_tile_width", self.ground_tile_width)?;

        for (field, value) in [
            ("base_gravity", self.base_gravity),
            ("double_jump_gravity", self.double_jump_gravity),
            ("fast_fall_gravity", self.fast_fall_gravity),
            ("jump_velocity", self.jump_velocity),
            ("double_jump_boost", self.double_jump_boost),
            ("player_start_x", self.player_start_x),
            ("floor_y", self.floor_y),
        ] {
            finite(field, value)?;
        }
        non_negative("double_jump_hold_ms", self.double_jump_hold_ms)?;

        hitbox("upright_hitbox", &self.upright_hitbox)?;
        hitbox("duck_hitbox", &self.duck_hitbox)?;
        finite("obstacle_spawn.x", self.obstacle_spawn.x)?;
        finite("obstacle_spawn.y", self.obstacle_spawn.y)?;

        if self.obstacles.is_empty() {
            return Err(TuningError::invalid("obstacles", "must not be empty"));
        }
        for spec in &self.obstacles {
            if !(spec.size.x > 0.0 && spec.size.y > 0.0 && spec.size.is_finite()) {
                return Err(TuningError::invalid(
                    format!("obstacles[{}].size", spec.kind),
                    "must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Look up the table entry for an obstacle kind
    pub fn obstacle(&self, kind: u8) -> Option<&ObstacleSpec> {
        self.obstacles.iter().find(|s| s.kind == kind)
    }
}

fn finite(field: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::invalid(field, "must be finite"))
    }
}

fn positive(field: &str, value: f32) -> Result<(), TuningError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), TuningError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn hitbox(field: &str, spec: &HitboxSpec) -> Result<(), TuningError> {
    if !spec.offset.is_finite() {
        return Err(TuningError::invalid(format!("{field}.offset"), "must be finite"));
    }
    if !(spec.size.x > 0.0 && spec.size.y > 0.0 && spec.size.is_finite()) {
        return Err(TuningError::invalid(format!("{field}.size"), "must be positive"));
    }
    Ok(())
}
