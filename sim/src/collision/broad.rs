use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
};

use super::types::{Point3, Vec3};

/// Broad-phase accelerator over the level's triangles.
///
/// Leaf `i` of the BVH is triangle `i` of the owning `SpatialWorld`, so query
/// results index the triangle list directly.
pub struct WorldAccel {
    /// BVH over triangle AABBs.
    pub bvh: Bvh,
    len: usize,
}

impl WorldAccel {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
}

/// Build the accelerator from world-space triangles.
pub fn build_world_accel(triangles: &[[Point3; 3]]) -> WorldAccel {
    let aabbs: Vec<Aabb> = triangles.iter().map(triangle_aabb).collect();
    WorldAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        len: aabbs.len(),
    }
}

/// Query triangle indices whose AABB intersects `aabb`.
pub fn query_candidates(accel: &WorldAccel, aabb: &Aabb) -> Vec<usize> {
    if accel.is_empty() {
        return Vec::new();
    }
    accel
        .bvh
        .intersect_aabb(aabb)
        .map(|leaf_idx| leaf_idx as usize)
        .filter(|&i| i < accel.len)
        .collect()
}

fn triangle_aabb(tri: &[Point3; 3]) -> Aabb {
    let [a, b, c] = tri;
    let min = Point3::new(
        a.x.min(b.x).min(c.x),
        a.y.min(b.y).min(c.y),
        a.z.min(b.z).min(c.z),
    );
    let max = Point3::new(
        a.x.max(b.x).max(c.x),
        a.y.max(b.y).max(c.y),
        a.z.max(b.z).max(c.z),
    );
    Aabb {
        mins: min,
        maxs: max,
    }
}

/// Inflate an AABB by `margin` on all sides.
pub fn aabb_inflate(a: &Aabb, margin: f32) -> Aabb {
    if margin <= 0.0 {
        return *a;
    }
    let delta = Vec3::new(margin, margin, margin);
    Aabb {
        mins: a.mins - delta,
        maxs: a.maxs + delta,
    }
}
