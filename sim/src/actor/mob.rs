use std::fmt;

use super::{ActorParams, ActorState};
use crate::collision::{Capsule, CollisionWorld, Vec3};
use crate::config::SimConfig;
use crate::constants::DIR_EPS_SQ;
use crate::view::VisualHandle;

/// Stable identifier of a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MobId(pub u32);

impl fmt::Display for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mob#{}", self.0)
    }
}

/// An enemy that walks straight at the player.
#[derive(Clone, Debug)]
pub struct Mob {
    pub id: MobId,
    pub state: ActorState,
    /// Last horizontal heading (unit length).
    pub target_direction: Vec3,
    pub alive: bool,
    /// Facing angle around +Y for the view, `atan2(dir.x, dir.z)`.
    pub yaw: f32,
    /// Seconds until this mob may hurt the player again.
    pub attack_cooldown: f32,
    pub visual: Option<VisualHandle>,
}

impl Mob {
    /// A mob standing on `base` (the lower capsule endpoint sits `radius` above it).
    pub fn new(id: MobId, base: Vec3, cfg: &SimConfig) -> Self {
        let radius = cfg.actor_radius;
        let lift = Vec3::new(0.0, radius, 0.0);
        let collider = Capsule::upright(base + lift, cfg.actor_segment_height, radius);
        let respawn = Capsule::upright(lift, cfg.actor_segment_height, radius);
        Self {
            id,
            state: ActorState::new(collider, respawn, cfg.mob_health),
            target_direction: Vec3::new(0.0, 0.0, 1.0),
            alive: true,
            yaw: 0.0,
            attack_cooldown: 0.0,
            visual: None,
        }
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.state.health
    }

    /// Alive and visible; only these mobs are simulated.
    #[inline]
    pub fn is_simulated(&self) -> bool {
        self.alive && self.visual.is_some()
    }

    /// Where loot drops and the kill is reported: the capsule's lower endpoint.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.collider.start
    }

    /// Point the horizontal velocity straight at `target` at `speed`.
    ///
    /// Vertical velocity is kept so gravity still accumulates. When the mob
    /// stands right on the target the previous heading is reused.
    pub fn chase(&mut self, target: Vec3, speed: f32) {
        let mut to_target = target - self.state.center();
        to_target.y = 0.0;
        if to_target.norm_squared() > DIR_EPS_SQ && to_target.iter().all(|v| v.is_finite()) {
            self.target_direction = to_target.normalize();
        }
        let dir = self.target_direction;
        self.yaw = dir.x.atan2(dir.z);
        self.state.velocity.x = dir.x * speed;
        self.state.velocity.z = dir.z * speed;
    }

    /// AI, integration and world collision for one substep.
    pub fn update<W>(&mut self, target: Vec3, dt: f32, world: &W, cfg: &SimConfig)
    where
        W: CollisionWorld + ?Sized,
    {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.chase(target, cfg.mob_speed);
        self.state.integrate(dt, &ActorParams::mob(cfg));
        self.state.collide_world(world);
    }

    /// Apply damage. Returns true exactly once: on the hit that kills the mob.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.state.health -= amount;
        if self.state.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Start the attack cooldown if it has run out. Returns whether the mob attacks.
    pub fn try_attack(&mut self, cooldown: f32) -> bool {
        if self.attack_cooldown > 0.0 {
            return false;
        }
        self.attack_cooldown = cooldown;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mob() -> Mob {
        Mob::new(MobId(1), Vec3::new(2.0, 0.0, 0.0), &SimConfig::default())
    }

    #[test]
    fn chase_sets_horizontal_velocity_toward_target() {
        let mut mob = mob();
        mob.state.velocity.y = -3.0;
        mob.chase(Vec3::new(2.0, 5.0, 4.0), 1.0);
        assert_relative_eq!(mob.state.velocity, Vec3::new(0.0, -3.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(mob.yaw, 0.0);
    }

    #[test]
    fn coincident_target_keeps_previous_heading() {
        let mut mob = mob();
        mob.chase(Vec3::new(-5.0, 0.0, 0.0), 2.0);
        let center = mob.state.center();
        mob.chase(center, 2.0);
        assert_relative_eq!(mob.state.velocity.x, -2.0, epsilon = 1e-6);
        assert!(mob.state.velocity.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn killing_blow_reports_once() {
        let mut mob = mob();
        mob.state.health = 25;
        assert!(mob.take_damage(25));
        assert!(!mob.alive);
        assert!(!mob.take_damage(25));
        assert_eq!(mob.hp(), 0);
    }

    #[test]
    fn attack_respects_cooldown() {
        let mut mob = mob();
        assert!(mob.try_attack(1.0));
        assert!(!mob.try_attack(1.0));
        mob.attack_cooldown = 0.0;
        assert!(mob.try_attack(1.0));
    }

    #[test]
    fn respawn_pose_is_at_origin() {
        let mob = mob();
        assert_relative_eq!(mob.state.respawn.start, Vec3::new(0.0, 0.35, 0.0));
        assert_relative_eq!(mob.position(), Vec3::new(2.0, 0.35, 0.0));
    }
}
