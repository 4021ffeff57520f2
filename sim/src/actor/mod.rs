//! Capsule actors: the player and the mobs.
//!
//! Both run the same per-substep pipeline, in this order:
//! input or AI, integrate, world collision, actor push-apart, out-of-bounds
//! check. The shared parts live on [`ActorState`]; [`Player`] and [`Mob`] add
//! their own steering on top.

pub mod mob;
pub mod player;

pub use mob::{Mob, MobId};
pub use player::Player;

use crate::body::BodyKind;
use crate::collision::{Capsule, CollisionWorld, Vec3, resolve_capsule_against_world};
use crate::config::SimConfig;
use crate::motion::{apply_damping, damping_factor};

/// Throwable ammunition carried by an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ammo {
    pub coins: u32,
    pub items: u32,
}

impl Ammo {
    pub fn count(&self, kind: BodyKind) -> u32 {
        match kind {
            BodyKind::Coin => self.coins,
            BodyKind::Item => self.items,
            BodyKind::Ball => 0,
        }
    }

    /// Add one unit of `kind`. Balls are not ammunition and are ignored.
    pub fn add(&mut self, kind: BodyKind) {
        match kind {
            BodyKind::Coin => self.coins = self.coins.saturating_add(1),
            BodyKind::Item => self.items = self.items.saturating_add(1),
            BodyKind::Ball => {}
        }
    }

    /// Remove one unit of `kind`; false when there is none.
    pub fn take(&mut self, kind: BodyKind) -> bool {
        let slot = match kind {
            BodyKind::Coin => &mut self.coins,
            BodyKind::Item => &mut self.items,
            BodyKind::Ball => return false,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Kind thrown next: items first, then coins.
    pub fn next_throwable(&self) -> Option<BodyKind> {
        if self.items > 0 {
            Some(BodyKind::Item)
        } else if self.coins > 0 {
            Some(BodyKind::Coin)
        } else {
            None
        }
    }
}

/// Motion parameters that differ between the player and mobs.
#[derive(Clone, Copy, Debug)]
pub struct ActorParams {
    pub gravity: f32,
    pub damping_rate: f32,
    pub air_damping_factor: f32,
}

impl ActorParams {
    pub fn player(cfg: &SimConfig) -> Self {
        Self {
            gravity: cfg.player_gravity,
            damping_rate: cfg.actor_damping_rate,
            air_damping_factor: cfg.air_damping_factor,
        }
    }

    pub fn mob(cfg: &SimConfig) -> Self {
        Self {
            gravity: cfg.mob_gravity,
            ..Self::player(cfg)
        }
    }
}

/// State shared by every capsule actor.
#[derive(Clone, Debug)]
pub struct ActorState {
    pub collider: Capsule,
    pub velocity: Vec3,
    pub on_floor: bool,
    pub health: i32,
    pub ammo: Ammo,
    /// Pose restored when the actor falls out of the level.
    pub respawn: Capsule,
}

impl ActorState {
    pub fn new(collider: Capsule, respawn: Capsule, health: i32) -> Self {
        Self {
            collider,
            velocity: Vec3::zeros(),
            on_floor: false,
            health,
            ammo: Ammo::default(),
            respawn,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.collider.center()
    }

    /// Apply damping and gravity, then move the capsule by the new velocity.
    ///
    /// Damping is `exp(-rate * dt) - 1`, reduced while airborne so jumps
    /// keep their momentum.
    pub fn integrate(&mut self, dt: f32, params: &ActorParams) {
        let mut damping = damping_factor(params.damping_rate, dt);
        if !self.on_floor {
            self.velocity.y -= params.gravity * dt;
            damping *= params.air_damping_factor;
        }
        apply_damping(&mut self.velocity, damping);
        self.collider.translate(self.velocity * dt);
    }

    /// Push out of the level and refresh `on_floor`.
    pub fn collide_world<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        self.on_floor = resolve_capsule_against_world(world, &mut self.collider, &mut self.velocity);
    }

    /// Move by a push-apart offset. Velocity is left alone.
    #[inline]
    pub fn nudge(&mut self, offset: Vec3) {
        if offset.iter().all(|v| v.is_finite()) {
            self.collider.translate(offset);
        }
    }

    /// Reset to the respawn pose when the capsule bottom is below `threshold_y`
    /// or the pose has gone non-finite. Returns whether a reset happened.
    pub fn respawn_if_out_of_bounds(&mut self, threshold_y: f32) -> bool {
        let bottom = self.collider.bottom();
        if self.collider.is_finite() && bottom >= threshold_y {
            return false;
        }
        self.collider = self.respawn;
        self.velocity = Vec3::zeros();
        self.on_floor = false;
        true
    }
}
