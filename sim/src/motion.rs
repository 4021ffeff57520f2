// Velocity integration helpers shared by actors and bodies.
//
// Keep this file focused on per-substep velocity math; collision response
// lives in `collision::resolve`.

use crate::collision::Vec3;

/// Exponential damping factor for one substep: `exp(-rate * dt) - 1`.
///
/// Always in `(-1, 0]` for `rate >= 0` and `dt >= 0`, so `v + v * factor`
/// shrinks a velocity toward zero without flipping its sign. Negative `dt`
/// counts as zero.
#[inline]
pub fn damping_factor(rate: f32, dt: f32) -> f32 {
    (-rate.max(0.0) * dt.max(0.0)).exp() - 1.0
}

/// Scale `velocity` by `1 + factor`.
#[inline]
pub fn apply_damping(velocity: &mut Vec3, factor: f32) {
    *velocity += *velocity * factor;
}
