pub mod actor;
pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod economy;
pub mod error;
pub mod input;
pub mod level;
pub mod motion;
pub mod simulation;
pub mod spawn;
pub mod throw;
pub mod view;

pub use actor::{Ammo, Mob, MobId, Player};
pub use body::{BodyId, BodyKind, DynamicBody};
pub use collision::{Capsule, CollisionInfo, CollisionWorld, SpatialWorld, SphereCollider, Vec3};
pub use config::SimConfig;
pub use economy::{Shop, ShopError};
pub use error::{Result, SimError};
pub use input::{InputState, Key, ViewAngles};
pub use level::{MeshShapeDef, WorldStaticDef, demo_arena, flat_floor};
pub use simulation::SimulationContext;
pub use throw::throw_impulse;
pub use view::{SimEvent, VisualHandle, WorldView};
