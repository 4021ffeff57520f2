/*!
Collision root module.

Everything the simulation needs to keep actors and bodies out of the level
and out of each other:

- types:        shared data types (Capsule, SphereCollider, CollisionInfo, math aliases)
- settings:     numeric tolerances for the queries
- broad:        BVH over level triangles and candidate queries
- narrow_phase: thin wrappers over parry penetration contacts
- world:        the static `SpatialWorld` and the `CollisionWorld` query trait
- resolve:      velocity/position response (world, sphere pairs, capsule vs sphere, push-apart)
*/

pub mod broad;
pub mod narrow_phase;
pub mod resolve;
pub mod settings;
pub mod types;
pub mod world;

// Re-export commonly used types and functions.
pub use resolve::{
    capsule_sphere_contacts, capsule_sphere_overlap, push_apart, resolve_capsule_against_world, resolve_sphere_pair,
    resolve_sphere_pairs,
};
pub use types::{Capsule, CollisionInfo, Iso, Point3, Quat, SphereCollider, Vec3};
pub use world::{CollisionWorld, SpatialWorld};
