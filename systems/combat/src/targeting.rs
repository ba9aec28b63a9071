//! Nearest-in-range target selection.

use neon_arcade_core::Vec2;
use neon_arcade_world::Enemy;

/// Index of the nearest live enemy strictly inside `range_squared` of `origin`.
///
/// Ties keep the enemy found first in store order.
#[must_use]
pub fn nearest_in_range(origin: Vec2, range_squared: f32, enemies: &[Enemy]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let distance = origin.distance_squared(enemy.position);
        if distance >= range_squared {
            continue;
        }
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
