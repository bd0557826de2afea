//! Per-frame simulation tick and round lifecycle
//!
//! Order within a running tick: player, obstacles, ground scroll,
//! collision, then score. A collision ends the round before the score
//! timer runs, and nothing moves again until a restart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::first_hit;
use super::player::update_player;
use super::rect::Rect;
use super::score::{format_score, update_score};
use super::spawner::update_obstacles;
use super::state::{GameEvent, GameState, PlayerState, RoundPhase};
use crate::tuning::Tuning;

/// Abstract input signals for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump went down this frame (edge)
    pub jump_just_pressed: bool,
    /// Jump is currently down
    pub jump_held: bool,
    /// How long jump has been held (ms)
    pub jump_held_ms: f32,
    /// Duck is currently down
    pub duck_held: bool,
}

/// Player pose for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub pos: Vec2,
    pub state: PlayerState,
    /// Duck body shown instead of the upright one
    pub ducking: bool,
    pub hitbox: Rect,
}

/// Obstacle pose for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePose {
    pub id: u32,
    pub kind: u8,
    pub bounds: Rect,
}

/// Snapshot handed back to the host after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub running: bool,
    pub score: u64,
    /// Score zero-padded to `SCORE_DIGITS`
    pub score_text: String,
    pub player: PlayerPose,
    pub obstacles: Vec<ObstaclePose>,
    pub ground_offset: f32,
    /// Run animation should play
    pub animating: bool,
    pub events: Vec<GameEvent>,
}

impl TickResult {
    pub fn from_state(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            running: state.is_running(),
            score: state.score,
            score_text: format_score(state.score),
            player: PlayerPose {
                pos: player.pos,
                state: player.state(),
                ducking: player.ducking,
                hitbox: player.visible_hitbox(&state.tuning),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstaclePose {
                    id: o.id,
                    kind: o.kind,
                    bounds: o.bounds(),
                })
                .collect(),
            ground_offset: state.ground_offset,
            animating: state.is_running(),
            events: state.events.clone(),
        }
    }
}

/// Advance a running round by `delta_ms`; a finished round is left untouched
///
/// Events from the previous tick are dropped and the delta is clamped to
/// `[0, max_frame_ms]` before anything moves.
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) {
    state.events.clear();
    if state.phase == RoundPhase::GameOver {
        return;
    }

    let delta_ms = sanitize_delta(delta_ms, state.tuning.max_frame_ms);
    state.time_ticks += 1;

    update_player(&mut state.player, input, delta_ms, &state.tuning, &mut state.events);
    update_obstacles(state, delta_ms);
    state.ground_offset =
        (state.ground_offset + state.tuning.game_speed).rem_euclid(state.tuning.ground_tile_width);

    if let Some(obstacle_id) = first_hit(&state.player, &state.obstacles, &state.tuning) {
        game_over(state, obstacle_id);
        return;
    }

    update_score(state, delta_ms);
}

/// Freeze the world and mark the player hurt
fn game_over(state: &mut GameState, obstacle_id: u32) {
    state.phase = RoundPhase::GameOver;
    state.spawn_timer_ms = 0.0;
    state.player.hurt = true;
    state.player.ducking = false;
    state.events.push(GameEvent::GameOver {
        score: state.score,
        obstacle_id,
    });
    log::info!(
        "Game over: hit obstacle {} after {} ticks, score {}",
        obstacle_id,
        state.time_ticks,
        format_score(state.score)
    );
}

/// Negative or non-finite frame deltas become zero, long ones `max_ms`
pub fn sanitize_delta(delta_ms: f32, max_ms: f32) -> f32 {
    if !(delta_ms.is_finite() && delta_ms >= 0.0) {
        log::warn!("Clamping invalid frame delta {} to 0", delta_ms);
        0.0
    } else if delta_ms > max_ms {
        log::warn!("Clamping frame delta {} to {}", delta_ms, max_ms);
        max_ms
    } else {
        delta_ms
    }
}

/// A play session: the current round plus restart handling
#[derive(Debug, Clone)]
pub struct Round {
    state: GameState,
    restart_requested: bool,
    final_score: Option<u64>,
    best_score: u64,
}

impl Round {
    /// Start a session with a running round
    pub fn new(tuning: Tuning) -> Self {
        let mut round = Self {
            state: GameState::new(tuning),
            restart_requested: false,
            final_score: None,
            best_score: 0,
        };
        round.initialize_round();
        round
    }

    /// (Re)enter Running with a fresh player, no obstacles and zero score
    pub fn initialize_round(&mut self) {
        self.state.events.clear();
        self.state.reset();
        self.restart_requested = false;
        log::info!("Round started");
    }

    /// Queue a restart, applied at the start of the next tick
    pub fn request_restart(&mut self) {
        if self.state.is_running() {
            log::debug!("Restart requested while running; ignored");
            return;
        }
        self.restart_requested = true;
    }

    /// Advance one frame
    pub fn tick(&mut self, delta_ms: f32, input: &TickInput) -> TickResult {
        self.state.events.clear();

        if self.restart_requested {
            self.initialize_round();
            return self.snapshot();
        }

        tick(&mut self.state, input, delta_ms);

        for event in &self.state.events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.final_score = Some(score);
                self.best_score = self.best_score.max(score);
            }
        }

        self.snapshot()
    }

    /// Current state as the host sees it
    pub fn snapshot(&self) -> TickResult {
        TickResult::from_state(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Score of the most recent finished round
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Best score this session (in memory only)
    pub fn best_score(&self) -> u64 {
        self.best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;

    const FRAME_MS: f32 = 16.0;

    /// Obstacle sitting right on top of the resting player
    fn hit_player(round: &mut Round) {
        let hitbox = round.state.player.upright_hitbox(&round.state.tuning);
        let id = round.state.next_entity_id();
        round.state.obstacles.push(Obstacle {
            id,
            kind: 1,
            pos: hitbox.min + Vec2::new(GAME_SPEED, 0.0),
            size: Vec2::new(20.0, 20.0),
        });
    }

    #[test]
    fn test_initial_round() {
        let round = Round::new(Tuning::default());
        let result = round.snapshot();
        assert!(result.running);
        assert!(result.animating);
        assert_eq!(result.score, 0);
        assert_eq!(result.score_text, "0000000");
        assert!(result.obstacles.is_empty());
        assert_eq!(result.player.state, PlayerState::Grounded);
        assert_eq!(result.events, vec![GameEvent::RoundStarted]);
    }

    #[test]
    fn test_first_spawn_after_one_second() {
        let mut round = Round::new(Tuning::default());
        let result = round.tick(1000.0, &TickInput::default());
        assert_eq!(result.obstacles.len(), 1);
        assert!(result.events.contains(&GameEvent::ObstacleSpawned {
            id: result.obstacles[0].id,
            kind: result.obstacles[0].kind,
            pos: OBSTACLE_SPAWN.into(),
        }));
        assert_eq!(result.score, 25);
        assert_eq!(result.ground_offset, GAME_SPEED);
    }

    #[test]
    fn test_collision_ends_round() {
        let mut round = Round::new(Tuning::default());
        round.tick(FRAME_MS, &TickInput::default());
        let score_before = round.score();
        hit_player(&mut round);

        let result = round.tick(FRAME_MS, &TickInput::default());
        assert!(!result.running);
        assert!(!result.animating);
        assert_eq!(result.player.state, PlayerState::Hurt);
        assert!(!result.player.ducking);
        // Score timer does not run on the collision tick
        assert_eq!(result.score, score_before);
        assert_eq!(round.final_score(), Some(score_before));
        assert_eq!(round.state().spawn_timer_ms, 0.0);
        assert!(matches!(result.events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_world_frozen_after_game_over() {
        let mut round = Round::new(Tuning::default());
        round.tick(900.0, &TickInput::default());
        hit_player(&mut round);
        let frozen = round.tick(FRAME_MS, &TickInput::default());
        assert!(!frozen.running);

        let jump = TickInput {
            jump_just_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        for _ in 0..100 {
            let result = round.tick(500.0, &jump);
            assert_eq!(result.score, frozen.score);
            assert_eq!(result.player, frozen.player);
            assert_eq!(result.obstacles, frozen.obstacles);
            assert_eq!(result.ground_offset, frozen.ground_offset);
            assert!(result.events.is_empty());
        }
    }

    #[test]
    fn test_restart_matches_fresh_round() {
        let fresh = Round::new(Tuning::default()).snapshot();

        let mut round = Round::new(Tuning::default());
        for _ in 0..120 {
            round.tick(FRAME_MS, &TickInput::default());
        }
        hit_player(&mut round);
        round.tick(FRAME_MS, &TickInput::default());
        assert!(!round.is_running());

        round.request_restart();
        let result = round.tick(FRAME_MS, &TickInput::default());
        assert_eq!(result, fresh);
        assert_eq!(round.state().spawn_timer_ms, 0.0);
        assert_eq!(round.state().score_timer_ms, 0.0);

        // Next tick simulates again
        let result = round.tick(FRAME_MS, &TickInput::default());
        assert!(result.running);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut round = Round::new(Tuning::default());
        round.tick(400.0, &TickInput::default());
        round.request_restart();
        let result = round.tick(FRAME_MS, &TickInput::default());
        assert!(result.score > 0);
        assert!(!result.events.contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_best_score_across_rounds() {
        let mut round = Round::new(Tuning::default());
        round.tick(400.0, &TickInput::default());
        hit_player(&mut round);
        round.tick(0.0, &TickInput::default());
        assert_eq!(round.best_score(), 10);

        round.request_restart();
        round.tick(0.0, &TickInput::default());
        round.tick(80.0, &TickInput::default());
        hit_player(&mut round);
        round.tick(0.0, &TickInput::default());
        assert_eq!(round.final_score(), Some(2));
        assert_eq!(round.best_score(), 10);
    }

    #[test]
    fn test_invalid_delta_clamped() {
        assert_eq!(sanitize_delta(-5.0, MAX_FRAME_MS), 0.0);
        assert_eq!(sanitize_delta(f32::NAN, MAX_FRAME_MS), 0.0);
        assert_eq!(sanitize_delta(f32::INFINITY, MAX_FRAME_MS), 0.0);
        assert_eq!(sanitize_delta(16.0, MAX_FRAME_MS), 16.0);
        assert_eq!(sanitize_delta(1.0e12, MAX_FRAME_MS), MAX_FRAME_MS);

        let mut round = Round::new(Tuning::default());
        round.tick(500.0, &TickInput::default());
        let before = round.state().clone();
        let result = round.tick(-1000.0, &TickInput::default());
        assert_eq!(result.score, before.score);
        assert_eq!(round.state().spawn_timer_ms, before.spawn_timer_ms);
        assert_eq!(round.state().player.pos, before.player.pos);
    }

    #[test]
    fn test_huge_delta_is_bounded() {
        let mut round = Round::new(Tuning::default());
        let result = round.tick(1.0e12, &TickInput::default());
        let max_spawns = (MAX_FRAME_MS / SPAWN_INTERVAL_MS) as usize;
        assert_eq!(result.obstacles.len(), max_spawns);
        assert_eq!(result.score, (MAX_FRAME_MS / SCORE_INTERVAL_MS) as u64);
        assert!(round.state().spawn_timer_ms < SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_state_tick_clamps_and_clears_events() {
        let mut state = GameState::new(Tuning::default());
        assert_eq!(state.events, vec![GameEvent::RoundStarted]);

        tick(&mut state, &TickInput::default(), -500.0);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert_eq!(state.score_timer_ms, 0.0);
        assert!(state.events.is_empty());

        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.events.len(), 1);
        tick(&mut state, &TickInput::default(), 16.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_ground_offset_wraps() {
        let mut state = GameState::new(Tuning::default());
        state.ground_offset = GROUND_TILE_WIDTH - 2.0;
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.ground_offset, GAME_SPEED - 2.0);

        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), 0.0);
            assert!((0.0..GROUND_TILE_WIDTH).contains(&state.ground_offset));
        }
    }

    #[test]
    fn test_held_jump_clears_obstacle() {
        let mut round = Round::new(Tuning::default());
        let id = round.state.next_entity_id();
        round.state.obstacles.push(Obstacle {
            id,
            kind: 1,
            pos: Vec2::new(340.0, 340.0),
            size: Vec2::new(34.0, 70.0),
        });

        let press = TickInput {
            jump_just_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        round.tick(FRAME_MS, &press);

        for k in 1..120 {
            let input = TickInput {
                jump_held: true,
                jump_held_ms: k as f32 * FRAME_MS,
                ..Default::default()
            };
            let result = round.tick(FRAME_MS, &input);
            assert!(result.running, "hit on tick {k}");
        }
        assert!(round.state().player.on_floor);
        assert!(round.state().obstacles.iter().all(|o| o.id != id));
    }

    fn arb_input() -> impl Strategy<Value = (f32, TickInput)> {
        (0.0f32..120.0, any::<bool>(), any::<bool>(), 0.0f32..600.0, any::<bool>()).prop_map(
            |(delta, pressed, held, held_ms, duck)| {
                (
                    delta,
                    TickInput {
                        jump_just_pressed: pressed,
                        jump_held: held,
                        jump_held_ms: held_ms,
                        duck_held: duck,
                    },
                )
            },
        )
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_frozen(inputs in prop::collection::vec(arb_input(), 1..300)) {
            let mut round = Round::new(Tuning::default());
            let mut last = round.snapshot();
            for (delta, input) in &inputs {
                let result = round.tick(*delta, input);
                if last.running {
                    prop_assert!(result.score >= last.score);
                } else {
                    prop_assert_eq!(result.score, last.score);
                    prop_assert_eq!(&result.player, &last.player);
                    prop_assert_eq!(&result.obstacles, &last.obstacles);
                }
                last = result;
            }
        }

        #[test]
        fn prop_spawn_timer_stays_in_range(deltas in prop::collection::vec(0.0f32..3000.0, 1..100)) {
            let mut state = GameState::new(Tuning::default());
            let interval = state.tuning.spawn_interval_ms;
            let mut spawned = 0usize;
            let mut despawned = 0usize;
            for delta in deltas {
                state.events.clear();
                update_obstacles(&mut state, delta);
                prop_assert!(state.spawn_timer_ms >= 0.0 && state.spawn_timer_ms < interval);
                for event in &state.events {
                    match event {
                        GameEvent::ObstacleSpawned { .. } => spawned += 1,
                        GameEvent::ObstacleDespawned { .. } => despawned += 1,
                        _ => {}
                    }
                }
                prop_assert_eq!(state.obstacles.len(), spawned - despawned);
                prop_assert!(state.obstacles.iter().all(|o| o.bounds().right() >= 0.0));
            }
        }

        #[test]
        fn prop_restart_is_deterministic(inputs in prop::collection::vec(arb_input(), 1..200)) {
            let fresh = Round::new(Tuning::default()).snapshot();
            let mut round = Round::new(Tuning::default());
            for (delta, input) in &inputs {
                round.tick(*delta, input);
            }
            if !round.is_running() {
                round.request_restart();
                prop_assert_eq!(round.tick(16.0, &TickInput::default()), fresh);
            }
        }
    }
}
