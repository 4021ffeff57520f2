//! Collision response.
//!
//! World queries only say how far a shape is inside the level; the functions
//! here decide what happens to velocities and positions. All of them operate
//! on borrowed state for a single call and keep no memory between substeps.

use super::settings::{FALLBACK_NORMAL, FALLBACK_PUSH};
use super::types::{Capsule, SphereCollider, Vec3};
use super::world::CollisionWorld;
use crate::body::DynamicBody;
use crate::constants::DIR_EPS_SQ;

/// Resolve an actor capsule against the world.
///
/// An up-facing contact (`normal.y > 0`) counts as floor and leaves the
/// velocity alone; any other contact removes the velocity component into the
/// surface so the actor slides. The capsule is always translated out by the
/// full correction.
///
/// Returns whether the actor ended up on a floor.
pub fn resolve_capsule_against_world<W>(
    world: &W,
    collider: &mut Capsule,
    velocity: &mut Vec3,
) -> bool
where
    W: CollisionWorld + ?Sized,
{
    let Some(hit) = world.capsule_intersect(collider) else {
        return false;
    };

    let on_floor = hit.is_floor();
    if !on_floor {
        *velocity -= hit.normal * hit.normal.dot(velocity);
    }
    collider.translate(hit.correction());
    on_floor
}

/// Swap the velocity components of `v1` and `v2` along `normal`.
///
/// For equal masses this is a perfectly elastic collision: momentum and
/// kinetic energy along the normal are both preserved.
#[inline]
pub fn exchange_along_normal(normal: &Vec3, v1: &mut Vec3, v2: &mut Vec3) {
    let a = normal * normal.dot(v1);
    let b = normal * normal.dot(v2);
    *v1 += b - a;
    *v2 += a - b;
}

/// Unit vector from `to` toward `from`, or `fallback` for coincident points.
#[inline]
fn direction_or(from: &Vec3, to: &Vec3, fallback: [f32; 3]) -> (Vec3, f32) {
    let delta = from - to;
    let dist_sq = delta.norm_squared();
    if dist_sq <= DIR_EPS_SQ {
        return (Vec3::from(fallback), 0.0);
    }
    let dist = dist_sq.sqrt();
    (delta / dist, dist)
}

/// Resolve one pair of overlapping spheres.
///
/// Returns false (and changes nothing) when they do not overlap. Otherwise the
/// along-normal velocities are swapped and each center moves half the overlap
/// apart, leaving the pair exactly touching.
pub fn resolve_sphere_pair(
    s1: &mut SphereCollider,
    v1: &mut Vec3,
    s2: &mut SphereCollider,
    v2: &mut Vec3,
) -> bool {
    let r = s1.radius + s2.radius;
    let dist_sq = (s1.center - s2.center).norm_squared();
    if dist_sq >= r * r {
        return false;
    }

    let (normal, dist) = direction_or(&s1.center, &s2.center, FALLBACK_NORMAL);
    exchange_along_normal(&normal, v1, v2);

    let half = (r - dist) * 0.5;
    s1.center += normal * half;
    s2.center -= normal * half;
    true
}

/// Resolve every overlapping pair in `bodies`.
///
/// This is the plain O(n^2) pair loop. It is fine for the few hundred bodies a
/// round produces and is the first thing to replace with a spatial hash if
/// body counts grow past that. Bodies that are not simulated (stowed, or
/// still waiting for a visual) are ignored.
///
/// Returns the number of pairs that were touching.
pub fn resolve_sphere_pairs(bodies: &mut [DynamicBody]) -> usize {
    let mut touching = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_simulated() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_simulated()) {
            let (s1, v1) = (&mut a.collider, &mut a.velocity);
            if resolve_sphere_pair(s1, v1, &mut b.collider, &mut b.velocity) {
                touching += 1;
            }
        }
    }
    touching
}

/// Resolve a sphere against an actor capsule using three sample points
/// (both endpoints and the midpoint).
///
/// Every sample point inside `capsule.radius + sphere.radius` of the sphere
/// center exchanges along-normal velocity with the actor and pushes the sphere
/// away by half the overlap. Several points can fire in the same call, so a
/// sphere wedged against a capsule gets pushed more than once; the actor is
/// never moved here.
///
/// Returns the number of sample points that touched.
pub fn capsule_sphere_contacts(
    capsule: &Capsule,
    actor_velocity: &mut Vec3,
    sphere: &mut SphereCollider,
    sphere_velocity: &mut Vec3,
) -> u32 {
    let r = capsule.radius + sphere.radius;
    let r_sq = r * r;

    let mut touching = 0;
    for point in capsule.sample_points() {
        let dist_sq = (point - sphere.center).norm_squared();
        if dist_sq >= r_sq {
            continue;
        }
        let (normal, dist) = direction_or(&point, &sphere.center, FALLBACK_NORMAL);
        exchange_along_normal(&normal, actor_velocity, sphere_velocity);
        sphere.center -= normal * ((r - dist) * 0.5);
        touching += 1;
    }
    touching
}

/// Whether any of the capsule's three sample points is inside reach of the sphere.
pub fn capsule_sphere_overlap(capsule: &Capsule, sphere: &SphereCollider) -> bool {
    let r = capsule.radius + sphere.radius;
    capsule
        .sample_points()
        .iter()
        .any(|p| (p - sphere.center).norm_squared() < r * r)
}

/// Push vector that moves `self_center` out to `min_distance` from `other_center`.
///
/// Zero when they are already far enough apart. Coincident centers are pushed
/// along +X by the full distance.
pub fn push_apart(self_center: &Vec3, other_center: &Vec3, min_distance: f32) -> Vec3 {
    let dist_sq = (self_center - other_center).norm_squared();
    if dist_sq >= min_distance * min_distance {
        return Vec3::zeros();
    }
    let (dir, dist) = direction_or(self_center, other_center, FALLBACK_PUSH);
    dir * (min_distance - dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyId, BodyKind};
    use crate::collision::{Quat, SpatialWorld};
    use crate::level::{MeshShapeDef, WorldStaticDef, flat_floor};
    use crate::view::VisualHandle;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_pair_conserves_momentum_and_separates() {
        let mut s1 = SphereCollider::new(Vec3::new(0.0, 0.0, 0.0), 0.2);
        let mut s2 = SphereCollider::new(Vec3::new(0.3, 0.1, 0.0), 0.2);
        let mut v1 = Vec3::new(4.0, -1.0, 2.0);
        let mut v2 = Vec3::new(-3.0, 0.5, 1.0);
        let before = v1 + v2;

        assert!(resolve_sphere_pair(&mut s1, &mut v1, &mut s2, &mut v2));

        assert_relative_eq!(v1 + v2, before, epsilon = 1e-5);
        let gap = (s1.center - s2.center).norm();
        assert_relative_eq!(gap, 0.4, epsilon = 1e-5);
    }

    #[test]
    fn head_on_equal_spheres_swap_velocities() {
        let mut s1 = SphereCollider::new(Vec3::new(-0.15, 0.0, 0.0), 0.2);
        let mut s2 = SphereCollider::new(Vec3::new(0.15, 0.0, 0.0), 0.2);
        let mut v1 = Vec3::new(2.0, 0.0, 0.0);
        let mut v2 = Vec3::new(-1.0, 0.0, 0.0);
        resolve_sphere_pair(&mut s1, &mut v1, &mut s2, &mut v2);
        assert_relative_eq!(v1, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(v2, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn coincident_spheres_do_not_produce_nan() {
        let mut s1 = SphereCollider::new(Vec3::new(1.0, 1.0, 1.0), 0.2);
        let mut s2 = s1;
        let mut v1 = Vec3::new(1.0, 0.0, 0.0);
        let mut v2 = Vec3::zeros();
        assert!(resolve_sphere_pair(&mut s1, &mut v1, &mut s2, &mut v2));
        assert!(s1.center.iter().chain(s2.center.iter()).all(|v| v.is_finite()));
        assert_relative_eq!((s1.center - s2.center).norm(), 0.4, epsilon = 1e-6);
    }

    #[test]
    fn separated_spheres_are_untouched() {
        let mut s1 = SphereCollider::new(Vec3::zeros(), 0.2);
        let mut s2 = SphereCollider::new(Vec3::new(0.5, 0.0, 0.0), 0.2);
        let mut v1 = Vec3::new(1.0, 0.0, 0.0);
        let mut v2 = Vec3::zeros();
        assert!(!resolve_sphere_pair(&mut s1, &mut v1, &mut s2, &mut v2));
        assert_eq!(v1, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn pair_loop_skips_unsimulated_bodies() {
        let mut a = DynamicBody::new(BodyId(1), BodyKind::Coin, Vec3::zeros(), 0.2);
        let mut b = DynamicBody::new(BodyId(2), BodyKind::Coin, Vec3::new(0.1, 0.0, 0.0), 0.2);
        let mut c = DynamicBody::new(BodyId(3), BodyKind::Coin, Vec3::new(0.0, 0.1, 0.0), 0.2);
        a.visual = Some(VisualHandle(1));
        b.visual = Some(VisualHandle(2));
        c.visual = None;
        let mut bodies = vec![a, b, c];
        assert_eq!(resolve_sphere_pairs(&mut bodies), 1);
        assert_eq!(bodies[2].collider.center, Vec3::new(0.0, 0.1, 0.0));
    }

    #[test]
    fn capsule_sphere_exchange_uses_sample_points() {
        let capsule = Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let mut actor_v = Vec3::zeros();
        let mut sphere = SphereCollider::new(Vec3::new(0.5, 0.35, 0.0), 0.2);
        let mut sphere_v = Vec3::new(-3.0, 0.0, 0.0);

        let touching = capsule_sphere_contacts(&capsule, &mut actor_v, &mut sphere, &mut sphere_v);
        assert_eq!(touching, 1);
        // Only the start point is within 0.55; its normal is -X.
        assert_relative_eq!(actor_v, Vec3::new(-3.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(sphere_v, Vec3::zeros(), epsilon = 1e-5);
        assert_relative_eq!(sphere.center.x, 0.525, epsilon = 1e-5);
    }

    #[test]
    fn capsule_sphere_far_apart_is_noop() {
        let capsule = Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let mut actor_v = Vec3::new(1.0, 0.0, 0.0);
        let mut sphere = SphereCollider::new(Vec3::new(3.0, 0.35, 0.0), 0.2);
        let mut sphere_v = Vec3::zeros();
        assert_eq!(
            capsule_sphere_contacts(&capsule, &mut actor_v, &mut sphere, &mut sphere_v),
            0
        );
        assert_eq!(actor_v, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn overlap_matches_sample_point_reach() {
        let capsule = Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        assert!(capsule_sphere_overlap(
            &capsule,
            &SphereCollider::new(Vec3::new(0.5, 0.675, 0.0), 0.2)
        ));
        assert!(!capsule_sphere_overlap(
            &capsule,
            &SphereCollider::new(Vec3::new(0.6, 0.675, 0.0), 0.2)
        ));
    }

    #[test]
    fn push_apart_reaches_min_distance() {
        let push = push_apart(&Vec3::new(1.0, 0.0, 0.0), &Vec3::zeros(), 1.5);
        assert_relative_eq!(push, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(push_apart(&Vec3::new(2.0, 0.0, 0.0), &Vec3::zeros(), 1.5), Vec3::zeros());
        let coincident = push_apart(&Vec3::zeros(), &Vec3::zeros(), 2.0);
        assert_relative_eq!(coincident, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn floor_contact_keeps_velocity_and_reports_floor() {
        let world = SpatialWorld::build(flat_floor(10.0)).unwrap();
        let mut capsule = Capsule::upright(Vec3::new(1.0, 0.25, -2.0), 0.65, 0.35);
        let mut velocity = Vec3::new(1.0, -2.0, 0.0);
        assert!(resolve_capsule_against_world(&world, &mut capsule, &mut velocity));
        assert_eq!(velocity, Vec3::new(1.0, -2.0, 0.0));
        assert_relative_eq!(capsule.start.y, 0.35, epsilon = 1e-3);
    }

    /// A wall occupying x in [1, 2], z in [-5, 5].
    fn wall_world() -> SpatialWorld {
        let wall = WorldStaticDef::new(
            0,
            Vec3::new(1.5, 2.0, 0.0),
            Quat::identity(),
            MeshShapeDef::Cuboid {
                half_extents: Vec3::new(0.5, 2.0, 5.0),
            },
        );
        SpatialWorld::build(vec![wall]).unwrap()
    }

    #[test]
    fn wall_contact_slides() {
        let world = wall_world();
        let mut capsule = Capsule::upright(Vec3::new(0.75, 1.0, 0.0), 0.65, 0.35);
        let mut velocity = Vec3::new(3.0, 0.0, 2.0);

        assert!(!resolve_capsule_against_world(&world, &mut capsule, &mut velocity));
        assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.z, 2.0, epsilon = 1e-3);
        assert_relative_eq!(capsule.start.x, 0.65, epsilon = 1e-3);
    }

    #[test]
    fn face_seam_of_a_wall_is_not_a_floor() {
        // At z = -3 the capsule straddles the diagonal splitting the wall face.
        let world = wall_world();
        let mut capsule = Capsule::upright(Vec3::new(0.75, 1.0, -3.0), 0.65, 0.35);
        let mut velocity = Vec3::new(3.0, -2.0, 0.0);

        assert!(!resolve_capsule_against_world(&world, &mut capsule, &mut velocity));
        assert_relative_eq!(velocity.y, -2.0, epsilon = 1e-4);
        assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(capsule.start, Vec3::new(0.65, 1.0, -3.0), epsilon = 1e-3);
    }
}
