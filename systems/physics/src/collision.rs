//! Squared-distance overlap tests.

use neon_arcade_core::Vec2;

/// Reports whether two points are closer than `reach`.
#[must_use]
pub fn within(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}

/// Reports whether two circles overlap, with `slack` added to their reach.
#[must_use]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32, slack: f32) -> bool {
    within(a, b, radius_a + radius_b + slack)
}
