//! Player vertical motion
//!
//! One degree of freedom: gravity and velocity integrate y only. The
//! physics step runs first, then input is applied, so a jump issued this
//! tick leaves the launch velocity untouched until the next integration.
//!
//! Gravity regimes are layered every tick in a fixed order, later rules
//! overriding earlier ones:
//! 1. double jump (held past the threshold, once per airborne phase)
//! 2. fast fall (jump released)
//! 3. floor contact (baseline gravity, double jump re-armed)

use super::state::{GameEvent, Player};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Advance the player by `delta_ms` and apply this tick's input
pub fn update_player(
    player: &mut Player,
    input: &TickInput,
    delta_ms: f32,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    integrate(player, delta_ms, tuning);

    if input.jump_just_pressed && player.on_floor {
        player.velocity_y = tuning.jump_velocity;
        events.push(GameEvent::Jumped);
        log::debug!("Jump at x={:.0}", player.pos.x);
    }

    if input.jump_held
        && input.jump_held_ms > tuning.double_jump_hold_ms
        && !player.double_jump_used
        && !player.on_floor
    {
        player.gravity = tuning.double_jump_gravity;
        player.velocity_y += tuning.double_jump_boost;
        player.double_jump_used = true;
        events.push(GameEvent::DoubleJumped);
        log::debug!("Double jump, vy={:.0}", player.velocity_y);
    }

    if !input.jump_held {
        player.gravity = tuning.fast_fall_gravity;
    }

    if player.on_floor {
        player.gravity = tuning.base_gravity;
        player.double_jump_used = false;
    }

    player.ducking = input.duck_held;
}

/// Semi-implicit Euler step with the floor as the only collider
fn integrate(player: &mut Player, delta_ms: f32, tuning: &Tuning) {
    let dt = delta_ms / 1000.0;
    player.velocity_y += player.gravity * dt;
    player.pos.y += player.velocity_y * dt;

    let rest_y = Player::rest_y(tuning);
    if player.pos.y >= rest_y {
        player.pos.y = rest_y;
        if player.velocity_y > 0.0 {
            player.velocity_y = 0.0;
        }
        player.on_floor = true;
    } else {
        player.on_floor = false;
    }
}
