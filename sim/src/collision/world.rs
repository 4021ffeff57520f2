//! Static collision world.
//!
//! The level is flattened into triangles once and indexed by a BVH. Queries
//! push a working copy of the query shape out of every candidate triangle in
//! turn and report the accumulated correction, so a capsule wedged in a corner
//! gets one combined push instead of two conflicting ones.
//!
//! Edges shared by two coplanar triangles are recorded at build time so that
//! a shape pressed against the seam of a flat face is pushed along the face
//! normal, never along the seam's edge normal.
//!
//! The world is immutable after [`SpatialWorld::build`]; it is shared by
//! reference with everything that needs it and never locked.

use std::collections::HashMap;

use rapier3d::parry::bounding_volume::Aabb;

use super::broad::{self, WorldAccel};
use super::narrow_phase::{self, LevelTriangle};
use super::settings::{CANDIDATE_SKIN, COPLANAR_COS};
use super::types::{Capsule, CollisionInfo, Point3, SphereCollider, Vec3};
use crate::error::Result;
use crate::level::{self, WorldStaticDef};

/// Intersection queries against static geometry.
///
/// Implemented by [`SpatialWorld`]; tests and tools can substitute their own.
pub trait CollisionWorld {
    /// Correction that moves `capsule` out of the world, if it penetrates.
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<CollisionInfo>;

    /// Correction that moves `sphere` out of the world, if it penetrates.
    fn sphere_intersect(&self, sphere: &SphereCollider) -> Option<CollisionInfo>;
}

/// Triangle soup plus its broad-phase accelerator.
pub struct SpatialWorld {
    triangles: Vec<LevelTriangle>,
    accel: WorldAccel,
}

impl SpatialWorld {
    /// Build the world from level statics.
    pub fn build(defs: Vec<WorldStaticDef>) -> Result<Self> {
        let triangles = level::build_triangles(defs)?;
        Ok(Self::from_triangles(&triangles))
    }

    /// Build the world from world-space triangles.
    pub fn from_triangles(triangles: &[[Point3; 3]]) -> Self {
        let accel = broad::build_world_accel(triangles);
        let internal = internal_edges(triangles);
        let seams = internal.iter().flatten().filter(|&&e| e).count() / 2;
        let triangles: Vec<LevelTriangle> = triangles
            .iter()
            .zip(internal)
            .map(|(corners, edges)| LevelTriangle::new(corners, edges))
            .collect();
        log::info!(
            "spatial world built: {} triangles, {} coplanar seams",
            triangles.len(),
            seams
        );
        Self { triangles, accel }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Run `step` against every candidate triangle with a working copy of `shape`.
    ///
    /// `step` translates the copy out of the triangle and returns the applied
    /// correction; the sum of all corrections is returned.
    fn push_out<S, F>(&self, shape: &S, aabb: &Aabb, mut step: F) -> Option<Vec3>
    where
        S: Copy,
        F: FnMut(&mut S, &LevelTriangle) -> Option<Vec3>,
    {
        let query = broad::aabb_inflate(aabb, CANDIDATE_SKIN);
        let candidates = broad::query_candidates(&self.accel, &query);
        if candidates.is_empty() {
            return None;
        }

        let mut probe = *shape;
        let mut total = Vec3::zeros();
        let mut hit = false;
        for idx in candidates {
            if let Some(correction) = step(&mut probe, &self.triangles[idx]) {
                total += correction;
                hit = true;
            }
        }
        hit.then_some(total)
    }
}

type VertexKey = [u32; 3];

fn vertex_key(p: &Point3) -> VertexKey {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

fn edge_key(p: &Point3, q: &Point3) -> (VertexKey, VertexKey) {
    let (a, b) = (vertex_key(p), vertex_key(q));
    if a <= b { (a, b) } else { (b, a) }
}

/// For every triangle, which of its edges are shared with a coplanar,
/// same-facing neighbour. Vertices are matched bit for bit, which holds for
/// meshes emitted from a shared vertex list.
fn internal_edges(triangles: &[[Point3; 3]]) -> Vec<[bool; 3]> {
    let mut owners: HashMap<(VertexKey, VertexKey), Vec<usize>> = HashMap::new();
    for (t, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            owners
                .entry(edge_key(&tri[i], &tri[(i + 1) % 3]))
                .or_default()
                .push(t);
        }
    }

    let normals: Vec<Vec3> = triangles.iter().map(narrow_phase::face_normal).collect();
    triangles
        .iter()
        .enumerate()
        .map(|(t, tri)| {
            std::array::from_fn(|i| {
                owners
                    .get(&edge_key(&tri[i], &tri[(i + 1) % 3]))
                    .is_some_and(|shared| {
                        shared
                            .iter()
                            .any(|&o| o != t && normals[o].dot(&normals[t]) >= COPLANAR_COS)
                    })
            })
        })
        .collect()
}

impl CollisionWorld for SpatialWorld {
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<CollisionInfo> {
        if !capsule.is_finite() {
            return None;
        }
        let total = self.push_out(capsule, &capsule.aabb(), |probe, tri| {
            let contact = narrow_phase::capsule_triangle_contact(probe, tri)?;
            let correction = contact.correction();
            probe.translate(correction);
            Some(correction)
        })?;
        CollisionInfo::from_correction(total)
    }

    fn sphere_intersect(&self, sphere: &SphereCollider) -> Option<CollisionInfo> {
        if !(sphere.center.iter().all(|v| v.is_finite()) && sphere.radius.is_finite()) {
            return None;
        }
        let total = self.push_out(sphere, &sphere.aabb(), |probe, tri| {
            let contact = narrow_phase::sphere_triangle_contact(probe, tri)?;
            let correction = contact.correction();
            probe.center += correction;
            Some(correction)
        })?;
        CollisionInfo::from_correction(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::Quat;
    use crate::level::{MeshShapeDef, WorldStaticDef, flat_floor};
    use approx::assert_relative_eq;

    fn floor_world() -> SpatialWorld {
        SpatialWorld::build(flat_floor(10.0)).unwrap()
    }

    /// A 4 m high wall occupying x in [1, 2], z in [-5, 5].
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
    fn only_face_diagonals_are_internal() {
        let world = wall_world();
        assert_eq!(world.triangle_count(), 12);
        for tri in &world.triangles {
            assert_eq!(tri.internal_edges.iter().filter(|&&e| e).count(), 1);
        }

        let floor = floor_world();
        for tri in &floor.triangles {
            assert_eq!(tri.internal_edges.iter().filter(|&&e| e).count(), 1);
        }
    }

    #[test]
    fn wall_contact_is_horizontal_everywhere_on_the_face() {
        let world = wall_world();
        for z in [-4.0, -3.0, -1.5, 0.0, 1.5, 3.0, 4.0] {
            for y in [0.8, 1.0, 1.6, 2.2] {
                let capsule = Capsule::upright(Vec3::new(0.75, y, z), 0.65, 0.35);
                let hit = world.capsule_intersect(&capsule).unwrap();
                assert!(!hit.is_floor(), "floor contact at y {y}, z {z}: {:?}", hit.normal);
                assert_relative_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
                assert_relative_eq!(hit.depth, 0.1, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn capsule_above_floor_does_not_hit() {
        let world = floor_world();
        let capsule = Capsule::upright(Vec3::new(0.0, 1.0, 0.0), 0.65, 0.35);
        assert!(world.capsule_intersect(&capsule).is_none());
    }

    #[test]
    fn capsule_sunk_into_floor_reports_upward_correction() {
        let world = floor_world();
        let capsule = Capsule::upright(Vec3::new(1.5, 0.2, -0.5), 0.65, 0.35);
        let hit = world.capsule_intersect(&capsule).unwrap();
        assert!(hit.is_floor());
        assert_relative_eq!(hit.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-3);
        assert_relative_eq!(hit.depth, 0.15, epsilon = 1e-3);
    }

    #[test]
    fn correction_removes_penetration() {
        let world = floor_world();
        let mut capsule = Capsule::upright(Vec3::new(-2.0, 0.1, 3.0), 0.65, 0.35);
        let hit = world.capsule_intersect(&capsule).unwrap();
        capsule.translate(hit.correction());
        let residual = world.capsule_intersect(&capsule).map_or(0.0, |h| h.depth);
        assert!(residual < 1e-3, "residual penetration {residual}");
    }

    #[test]
    fn sphere_queries_use_the_same_index() {
        let world = floor_world();
        let inside = SphereCollider::new(Vec3::new(1.0, 0.1, -2.0), 0.2);
        let hit = world.sphere_intersect(&inside).unwrap();
        assert_relative_eq!(hit.depth, 0.1, epsilon = 1e-3);
        let outside = SphereCollider::new(Vec3::new(1.0, 0.5, -2.0), 0.2);
        assert!(world.sphere_intersect(&outside).is_none());
    }

    #[test]
    fn far_away_shapes_skip_narrow_phase() {
        let world = floor_world();
        let capsule = Capsule::upright(Vec3::new(100.0, 0.0, 100.0), 0.65, 0.35);
        assert!(world.capsule_intersect(&capsule).is_none());
    }

    #[test]
    fn non_finite_capsule_is_ignored() {
        let world = floor_world();
        let capsule = Capsule::upright(Vec3::new(f32::NAN, 0.0, 0.0), 0.65, 0.35);
        assert!(world.capsule_intersect(&capsule).is_none());
    }
}
