//! Player vs obstacle overlap
//!
//! Both player hitboxes are tested against every obstacle regardless of
//! which one is visible, unless `collide_visible_hitbox_only` is set.

use super::rect::Rect;
use super::state::{Obstacle, Player};
use crate::tuning::Tuning;

/// First obstacle overlapping any tested player hitbox
pub fn first_hit(player: &Player, obstacles: &[Obstacle], tuning: &Tuning) -> Option<u32> {
    let both = [player.upright_hitbox(tuning), player.duck_hitbox(tuning)];
    let visible = [player.visible_hitbox(tuning)];
    let hitboxes: &[Rect] = if tuning.collide_visible_hitbox_only {
        &visible
    } else {
        &both
    };

    obstacles
        .iter()
        .find(|o| {
            let bounds = o.bounds();
            hitboxes.iter().any(|h| h.overlaps(&bounds))
        })
        .map(|o| o.id)
}

/// True if the player touches any obstacle
pub fn check_collision(player: &Player, obstacles: &[Obstacle], tuning: &Tuning) -> bool {
    first_hit(player, obstacles, tuning).is_some()
}
