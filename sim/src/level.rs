//! Static level geometry.
//!
//! Levels are described as a list of [`WorldStaticDef`]s which are flattened
//! into world-space triangles once, when the [`SpatialWorld`](crate::SpatialWorld)
//! is built. Nothing here is touched again while the game runs.
//!
//! Determinism: definitions are sorted by `id` before triangulation, so the
//! same set of statics always produces the same triangle order.

use std::f32::consts::PI;

use crate::collision::types::{Point3, Quat, Vec3};
use crate::error::{Result, SimError};

/// Triangles with a doubled area below this are dropped (m^2).
const MIN_DOUBLE_AREA: f32 = 1.0e-8;

/// One immutable piece of level geometry placed in the world.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic build order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    /// Shape in local space.
    pub shape: MeshShapeDef,
}

/// Supported static shapes. All of them end up as triangles.
#[derive(Clone, Debug)]
pub enum MeshShapeDef {
    /// Finite rectangle on the local XZ plane, facing +Y.
    Quad { half_x: f32, half_z: f32 },

    /// Oriented box with half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Arbitrary indexed triangle mesh (e.g. an exported level model).
    TriMesh {
        vertices: Vec<Point3>,
        indices: Vec<[u32; 3]>,
    },
}

impl WorldStaticDef {
    pub fn new(id: u32, translation: Vec3, rotation: Quat, shape: MeshShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation,
            shape,
        }
    }

    /// World-space triangles of this static.
    pub fn triangulate(&self) -> Result<Vec<[Point3; 3]>> {
        let (vertices, indices) = self.local_mesh()?;

        let to_world = |p: &Point3| -> Point3 {
            Point3::from(self.rotation * p.coords + self.translation)
        };
        let world: Vec<Point3> = vertices.iter().map(to_world).collect();
        if world.iter().any(|p| !p.coords.iter().all(|v| v.is_finite())) {
            return Err(SimError::NonFiniteVertex { id: self.id });
        }

        let mut out = Vec::with_capacity(indices.len());
        for tri in indices {
            let mut corners = [Point3::origin(); 3];
            for (slot, &index) in corners.iter_mut().zip(tri.iter()) {
                *slot = *world.get(index as usize).ok_or(SimError::IndexOutOfRange {
                    id: self.id,
                    index,
                    len: world.len(),
                })?;
            }
            let [a, b, c] = corners;
            if (b - a).cross(&(c - a)).norm() <= MIN_DOUBLE_AREA {
                log::debug!("static {}: dropping degenerate triangle {:?}", self.id, tri);
                continue;
            }
            out.push(corners);
        }
        Ok(out)
    }

    fn local_mesh(&self) -> Result<(Vec<Point3>, Vec<[u32; 3]>)> {
        match &self.shape {
            MeshShapeDef::Quad { half_x, half_z } => {
                check_extent(self.id, "half_x", *half_x)?;
                check_extent(self.id, "half_z", *half_z)?;
                let (hx, hz) = (*half_x, *half_z);
                let vertices = vec![
                    Point3::new(-hx, 0.0, -hz),
                    Point3::new(-hx, 0.0, hz),
                    Point3::new(hx, 0.0, hz),
                    Point3::new(hx, 0.0, -hz),
                ];
                Ok((vertices, vec![[0, 1, 2], [0, 2, 3]]))
            }
            MeshShapeDef::Cuboid { half_extents: he } => {
                check_extent(self.id, "half_extents.x", he.x)?;
                check_extent(self.id, "half_extents.y", he.y)?;
                check_extent(self.id, "half_extents.z", he.z)?;
                // Corner i has bit 0 -> +x, bit 1 -> +y, bit 2 -> +z.
                let vertices = (0..8u32)
                    .map(|i| {
                        let sign = |bit: u32| if i & bit != 0 { 1.0 } else { -1.0 };
                        Point3::new(sign(1) * he.x, sign(2) * he.y, sign(4) * he.z)
                    })
                    .collect();
                let faces: [[u32; 4]; 6] = [
                    [0, 4, 6, 2],
                    [1, 3, 7, 5],
                    [0, 1, 5, 4],
                    [2, 6, 7, 3],
                    [0, 2, 3, 1],
                    [4, 5, 7, 6],
                ];
                let indices = faces
                    .iter()
                    .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
                    .collect();
                Ok((vertices, indices))
            }
            MeshShapeDef::TriMesh { vertices, indices } => Ok((vertices.clone(), indices.clone())),
        }
    }
}

fn check_extent(id: u32, name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidShape {
            id,
            reason: format!("{name} must be finite and > 0, got {value}"),
        })
    }
}

/// Flatten a level into world-space triangles, sorted by static id.
pub fn build_triangles(mut defs: Vec<WorldStaticDef>) -> Result<Vec<[Point3; 3]>> {
    defs.sort_by_key(|d| d.id);

    let mut triangles = Vec::new();
    for def in &defs {
        triangles.extend(def.triangulate()?);
    }
    if triangles.is_empty() {
        return Err(SimError::EmptyWorld);
    }
    Ok(triangles)
}

/// A single flat floor of `half_size` around the origin. Handy for tests and tooling.
pub fn flat_floor(half_size: f32) -> Vec<WorldStaticDef> {
    vec![WorldStaticDef::new(
        0,
        Vec3::zeros(),
        Quat::identity(),
        MeshShapeDef::Quad {
            half_x: half_size,
            half_z: half_size,
        },
    )]
}

/// Small walled arena: floor, a crate, a ramp, a staircase and four walls.
pub fn demo_arena() -> Vec<WorldStaticDef> {
    const HALF: f32 = 20.0;
    const WALL_HALF_HEIGHT: f32 = 2.0;
    const WALL_HALF_THICKNESS: f32 = 0.5;

    let mut defs = flat_floor(HALF);
    let mut next_id = 1u32;
    let mut push = |defs: &mut Vec<WorldStaticDef>, translation: Vec3, rotation: Quat, he: Vec3| {
        defs.push(WorldStaticDef::new(
            next_id,
            translation,
            rotation,
            MeshShapeDef::Cuboid { half_extents: he },
        ));
        next_id += 1;
    };

    // Crate to hide behind.
    push(
        &mut defs,
        Vec3::new(3.0, 1.0, 0.0),
        Quat::identity(),
        Vec3::new(1.0, 1.0, 1.0),
    );

    // Ramp tilted 20 degrees around X so walking +Z goes uphill.
    push(
        &mut defs,
        Vec3::new(-3.0, 0.0, 6.0),
        Quat::from_axis_angle(&Vec3::x_axis(), -PI / 9.0),
        Vec3::new(1.0, 1.0, 10.0),
    );

    // Staircase climbing along +X.
    let stairs_origin = Vec3::new(0.0, 0.0, -6.0);
    let step_run = 0.55;
    let step_rise = 0.2;
    let step_half = Vec3::new(step_run * 0.5, step_rise * 0.5, 1.5);
    for i in 0..10 {
        let fx = i as f32;
        push(
            &mut defs,
            Vec3::new(
                stairs_origin.x + fx * step_run,
                stairs_origin.y + fx * step_rise + step_half.y,
                stairs_origin.z,
            ),
            Quat::identity(),
            step_half,
        );
    }

    // Perimeter walls.
    for (x, z, hx, hz) in [
        (0.0, HALF, HALF, WALL_HALF_THICKNESS),
        (0.0, -HALF, HALF, WALL_HALF_THICKNESS),
        (HALF, 0.0, WALL_HALF_THICKNESS, HALF),
        (-HALF, 0.0, WALL_HALF_THICKNESS, HALF),
    ] {
        push(
            &mut defs,
            Vec3::new(x, WALL_HALF_HEIGHT, z),
            Quat::identity(),
            Vec3::new(hx, WALL_HALF_HEIGHT, hz),
        );
    }

    defs
}
