//! Back-and-forth motion of the active block

use super::state::{Axis, Block};
use crate::tuning::Tuning;

/// Half-width of the travel window around the support's center
#[inline]
pub fn movement_range(tuning: &Tuning, size: f32) -> f32 {
    size / 2.0 + tuning.movement_range_padding + tuning.movement_range_extra
}

/// Advance `active` along `axis` by one step, bouncing off the window edges.
///
/// The window is centered on the support block. Crossing an edge clamps the
/// position exactly onto it and points the direction back inward.
pub fn oscillate(
    active: &mut Block,
    support: &Block,
    axis: Axis,
    speed: f32,
    tuning: &Tuning,
    dt: f32,
) {
    let range = movement_range(tuning, active.size(axis));
    let origin = support.center(axis);
    let min = origin - range;
    let max = origin + range;

    let mut next = active.center(axis) + active.direction * speed * dt;
    if next < min {
        next = min;
        active.direction = 1.0;
    } else if next > max {
        next = max;
        active.direction = -1.0;
    }
    active.set_center(axis, next);
}
