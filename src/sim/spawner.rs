//! Obstacle spawn, scroll and cleanup
//!
//! The spawn timer wraps by subtraction so overshoot carries into the next
//! interval; a long frame can spawn several obstacles at once.

use rand::Rng;

use super::state::{GameEvent, GameState, Obstacle};

/// Spawn due obstacles, scroll every obstacle left, drop the ones off screen
pub fn update_obstacles(state: &mut GameState, delta_ms: f32) {
    let interval = state.tuning.spawn_interval_ms;
    state.spawn_timer_ms += delta_ms;
    while state.spawn_timer_ms >= interval {
        spawn_obstacle(state);
        state.spawn_timer_ms -= interval;
    }

    let speed = state.tuning.game_speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }

    let mut despawned = Vec::new();
    state.obstacles.retain(|o| {
        let off_screen = o.bounds().right() < 0.0;
        if off_screen {
            despawned.push(o.id);
        }
        !off_screen
    });
    for id in despawned {
        log::debug!("Obstacle {} left the screen", id);
        state.events.push(GameEvent::ObstacleDespawned { id });
    }
}

/// Create one obstacle at the spawn point with a uniformly drawn kind
pub fn spawn_obstacle(state: &mut GameState) {
    let index = state.rng.random_range(0..state.tuning.obstacles.len());
    let (kind, size) = {
        let spec = &state.tuning.obstacles[index];
        (spec.kind, spec.size)
    };
    let pos = state.tuning.obstacle_spawn;
    let id = state.next_entity_id();

    state.obstacles.push(Obstacle { id, kind, pos, size });
    state.events.push(GameEvent::ObstacleSpawned { id, kind, pos });
    log::debug!("Spawned obstacle {} (kind {})", id, kind);
}
