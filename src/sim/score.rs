//! Score cadence and display formatting

use super::state::GameState;
use crate::consts::SCORE_DIGITS;

/// Add one point per elapsed score interval, carrying the remainder
pub fn update_score(state: &mut GameState, delta_ms: f32) {
    let interval = state.tuning.score_interval_ms;
    state.score_timer_ms += delta_ms;
    while state.score_timer_ms >= interval {
        state.score += 1;
        state.score_timer_ms -= interval;
    }
}

/// Zero-padded score text as shown on the HUD
pub fn format_score(score: u64) -> String {
    format!("{:0width$}", score, width = SCORE_DIGITS)
}
