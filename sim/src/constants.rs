/*!
Default tuning values for the arena simulation.

These are the values `SimConfig::default()` is built from. Hosts that want to
tweak gameplay should override them through a config file rather than edit
them here.

Notes
- Distances are in meters, time in seconds, velocities in meters per second.
- Damping constants are rates for `exp(-rate * dt) - 1`.
*/

/// Fixed substeps run per rendered frame.
pub const STEPS_PER_FRAME: u32 = 5;

/// Upper bound for a frame delta before it is split into substeps.
/// Long stalls (tab switch, debugger) would otherwise tunnel through walls.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Gravity applied to the player capsule while airborne.
pub const PLAYER_GRAVITY: f32 = 30.0;

/// Gravity applied to mobs while airborne.
pub const MOB_GRAVITY: f32 = 100.0;

/// Gravity applied to coins, items and pool balls.
pub const BODY_GRAVITY: f32 = 30.0;

/// Input acceleration while standing on the floor.
pub const GROUND_ACCEL: f32 = 25.0;

/// Input acceleration while airborne.
pub const AIR_ACCEL: f32 = 8.0;

/// Upward velocity set by a jump.
pub const JUMP_SPEED: f32 = 5.0;

/// Velocity damping rate for actors.
pub const ACTOR_DAMPING_RATE: f32 = 4.0;

/// Multiplier on actor damping while airborne.
pub const AIR_DAMPING_FACTOR: f32 = 0.1;

/// Velocity damping rate for dynamic bodies.
pub const BODY_DAMPING_RATE: f32 = 1.5;

/// Reflection factor for bodies hitting world geometry.
/// 1.0 would slide, 2.0 would be a perfect mirror.
pub const BODY_BOUNCE: f32 = 1.5;

/// Mob chase speed.
pub const MOB_SPEED: f32 = 1.0;

/// Player/mob midpoint distance below which the player is pushed away.
pub const PLAYER_MOB_PUSH_DISTANCE: f32 = 1.5;

/// Mob/mob midpoint distance below which a mob is pushed away.
pub const MOB_MOB_PUSH_DISTANCE: f32 = 2.0;

/// Minimum throw impulse (no charge).
pub const THROW_BASE_IMPULSE: f32 = 15.0;

/// Extra impulse reached asymptotically by a fully charged throw.
pub const THROW_CHARGE_IMPULSE: f32 = 30.0;

/// Charge time after which the impulse stops growing.
pub const MAX_CHARGE_SECS: f32 = 8.0;

/// Multiplier on the thrower's velocity inherited by the projectile.
pub const THROW_INHERIT_FACTOR: f32 = 2.0;

/// Damage dealt by a thrown body.
pub const THROW_DAMAGE: i32 = 25;

/// Starting mob health.
pub const MOB_HEALTH: i32 = 100;

/// Starting player health.
pub const PLAYER_HEALTH: i32 = 10;

/// Damage a mob deals to the player while in push-apart range.
pub const MOB_CONTACT_DAMAGE: i32 = 1;

/// Seconds between two contact hits from the same mob.
pub const MOB_ATTACK_COOLDOWN: f32 = 1.0;

/// Coins the player starts with.
pub const START_COIN_AMMO: u32 = 5;

/// Items the player starts with.
pub const START_ITEM_AMMO: u32 = 4;

/// Capsules whose bottom falls below this height are respawned.
pub const OUT_OF_BOUNDS_Y: f32 = -25.0;

/// Height where collected bodies are parked.
pub const STOW_Y: f32 = -100.0;

/// Bodies dropped by a killed mob.
pub const LOOT_COUNT: u32 = 5;

/// How many of the dropped bodies are coins; the rest are items.
pub const LOOT_COIN_COUNT: u32 = 2;

/// Radius of the ring loot is placed on around the death position.
pub const LOOT_RING_RADIUS: f32 = 1.0;

/// Outward speed of freshly dropped loot.
pub const LOOT_SPEED: f32 = 10.0;

/// Radius of coin, item and ball colliders.
pub const BODY_RADIUS: f32 = 0.2;

/// Radius of actor capsules.
pub const ACTOR_RADIUS: f32 = 0.35;

/// Distance between the two capsule endpoints of a standing actor.
pub const ACTOR_SEGMENT_HEIGHT: f32 = 0.65;

/// Mouse pixels per radian of view rotation.
pub const MOUSE_PIXELS_PER_RADIAN: f32 = 500.0;

/// Seconds between mob spawns. Zero disables the spawner.
pub const MOB_SPAWN_INTERVAL: f32 = 10.0;

/// Spawner stops while this many mobs are alive.
pub const MOB_MAX_ALIVE: u32 = 2;

/// Distance at which the shop accepts purchases.
pub const SHOP_REACH: f32 = 3.0;

/// Coins spent per purchased item.
pub const SHOP_COIN_PRICE: u32 = 2;

/// Items the shop holds at start.
pub const SHOP_STOCK: u32 = 10;

/// Squared length below which a direction is treated as zero.
pub const DIR_EPS_SQ: f32 = 1.0e-12;
