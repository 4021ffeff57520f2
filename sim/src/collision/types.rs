/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no queries. It defines the primitives exchanged between:
- broad (triangle acceleration structure and candidate queries)
- narrow_phase (per-triangle penetration contacts through parry)
- world (iterative push-out against the static level)
- resolve (velocity response for actors and dynamic bodies)

Capsules here are segment capsules: two endpoints plus a radius, matching how
actors are placed (feet sphere center at `start`, eye sphere center at `end`).
They are converted to parry shapes only inside the narrow phase.
*/

use nalgebra as na;
use rapier3d::parry::bounding_volume::Aabb;

use super::settings::{MIN_CORRECTION, NORMAL_SNAP};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Segment capsule in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    #[inline]
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Upright capsule whose lower endpoint sits at `base`.
    #[inline]
    pub fn upright(base: Vec3, segment_height: f32, radius: f32) -> Self {
        Self::new(base, base + Vec3::new(0.0, segment_height, 0.0), radius)
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Lowest point of the capsule surface.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.start.y.min(self.end.y) - self.radius
    }

    /// The three points used for capsule/sphere tests: both endpoints and the midpoint.
    #[inline]
    pub fn sample_points(&self) -> [Vec3; 3] {
        [self.start, self.end, self.center()]
    }

    /// World-space AABB enclosing both end spheres.
    pub fn aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        let lo = self.start.inf(&self.end) - r;
        let hi = self.start.sup(&self.end) + r;
        Aabb::new(Point3::from(lo), Point3::from(hi))
    }

    pub fn is_finite(&self) -> bool {
        self.start.iter().chain(self.end.iter()).all(|v| v.is_finite()) && self.radius.is_finite()
    }
}

/// Sphere collider carried by dynamic bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereCollider {
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::new(Point3::from(self.center - r), Point3::from(self.center + r))
    }
}

/// Push-out correction returned by world queries.
///
/// Translating the queried shape by `normal * depth` moves it out of the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionInfo {
    /// Unit vector pointing away from the touched surface.
    pub normal: Vec3,
    /// Penetration depth along `normal` (meters, >= 0).
    pub depth: f32,
}

impl CollisionInfo {
    /// Split a total correction vector into direction and length.
    ///
    /// Returns `None` for corrections too small to have a stable direction.
    /// Normal components within rounding noise are snapped to zero, so a wall
    /// contact never reads as slightly up-facing.
    pub fn from_correction(correction: Vec3) -> Option<Self> {
        let depth = correction.norm();
        if !depth.is_finite() || depth <= MIN_CORRECTION {
            return None;
        }
        let normal = (correction / depth).map(|v| if v.abs() < NORMAL_SNAP { 0.0 } else { v });
        Some(Self {
            normal: normal.normalize(),
            depth,
        })
    }

    /// True when the surface faces upward enough to stand on.
    #[inline]
    pub fn is_floor(&self) -> bool {
        self.normal.y > 0.0
    }

    #[inline]
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn capsule_translate_moves_both_endpoints() {
        let mut c = Capsule::upright(Vec3::new(0.0, 0.35, 0.0), 0.65, 0.35);
        c.translate(Vec3::new(1.0, -2.0, 3.0));
        assert_relative_eq!(c.start, Vec3::new(1.0, -1.65, 3.0), epsilon = 1e-5);
        assert_relative_eq!(c.end, Vec3::new(1.0, -1.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(c.center(), Vec3::new(1.0, -1.325, 3.0), epsilon = 1e-5);
        assert_relative_eq!(c.bottom(), -2.0, epsilon = 1e-5);
    }

    #[test]
    fn capsule_aabb_covers_end_spheres() {
        let c = Capsule::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), 0.5);
        let aabb = c.aabb();
        assert_relative_eq!(aabb.mins.coords, Vec3::new(-0.5, -0.5, -0.5));
        assert_relative_eq!(aabb.maxs.coords, Vec3::new(2.5, 1.5, 0.5));
    }

    #[test]
    fn tiny_correction_has_no_direction() {
        assert!(CollisionInfo::from_correction(Vec3::zeros()).is_none());
        let info = CollisionInfo::from_correction(Vec3::new(0.0, 0.2, 0.0)).unwrap();
        assert!(info.is_floor());
        assert_relative_eq!(info.depth, 0.2);
        assert_relative_eq!(info.correction(), Vec3::new(0.0, 0.2, 0.0));
    }

    #[test]
    fn rounding_noise_does_not_make_a_floor() {
        let info = CollisionInfo::from_correction(Vec3::new(-0.1, 2.6e-9, 1.0e-9)).unwrap();
        assert!(!info.is_floor());
        assert_eq!(info.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(info.depth, 0.1);
    }
}
