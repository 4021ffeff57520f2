//! Dynamic bodies: coins, items and pool balls.
//!
//! Bodies are plain data. The simulation owns them in flat vectors and the
//! view layer refers to them by [`BodyId`]. A body is only simulated once the
//! view has attached a visual to it and while it is not stowed in the player's
//! inventory.

use std::fmt;

use crate::collision::{CollisionWorld, SphereCollider, Vec3};
use crate::motion::{apply_damping, damping_factor};
use crate::view::VisualHandle;

/// Stable identifier of a dynamic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Currency; collected into the coin counter, thrown as ammo.
    Coin,
    /// Throwable item; collected into the item counter.
    Item,
    /// Physics toy from the ball pool. Never collected, never damages.
    Ball,
}

#[derive(Clone, Debug)]
pub struct DynamicBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub collider: SphereCollider,
    pub velocity: Vec3,
    /// Lying loose in the play space; the player picks it up on contact.
    pub on_ground: bool,
    /// Live projectile; damages the first mob it touches.
    pub being_thrown: bool,
    /// Held in the inventory and parked off-stage.
    pub stowed: bool,
    pub visual: Option<VisualHandle>,
}

impl DynamicBody {
    /// A loose body resting at `center`.
    pub fn new(id: BodyId, kind: BodyKind, center: Vec3, radius: f32) -> Self {
        Self {
            id,
            kind,
            collider: SphereCollider::new(center, radius),
            velocity: Vec3::zeros(),
            on_ground: true,
            being_thrown: false,
            stowed: false,
            visual: None,
        }
    }

    /// Participates in physics this substep.
    #[inline]
    pub fn is_simulated(&self) -> bool {
        !self.stowed && self.visual.is_some()
    }

    /// Can be picked up by the player.
    #[inline]
    pub fn is_collectable(&self) -> bool {
        self.on_ground && !self.being_thrown && !self.stowed && self.kind != BodyKind::Ball
    }

    /// Move into the inventory: parked at `stow_y`, motionless, out of physics.
    pub fn stow(&mut self, stow_y: f32) {
        self.stowed = true;
        self.on_ground = false;
        self.being_thrown = false;
        self.velocity = Vec3::zeros();
        self.collider.center.y = stow_y;
    }

    /// Put the body back into play as a projectile.
    pub fn launch(&mut self, center: Vec3, velocity: Vec3, damaging: bool) {
        self.collider.center = center;
        self.velocity = velocity;
        self.stowed = false;
        self.on_ground = false;
        self.being_thrown = damaging;
    }

    /// Advance one substep against the static world.
    ///
    /// On contact the velocity loses `bounce` times its component into the
    /// surface and the body is pushed out; gravity only applies without
    /// contact. Settling on an up-facing surface ends a throw and makes the
    /// body collectable again.
    pub fn integrate<W>(&mut self, world: &W, dt: f32, params: &BodyParams)
    where
        W: CollisionWorld + ?Sized,
    {
        self.collider.center += self.velocity * dt;

        match world.sphere_intersect(&self.collider) {
            Some(hit) => {
                let into = hit.normal.dot(&self.velocity);
                self.velocity -= hit.normal * into * params.bounce;
                self.collider.center += hit.correction();
                if hit.is_floor() && !self.on_ground {
                    self.on_ground = true;
                    self.being_thrown = false;
                }
            }
            None => {
                self.velocity.y -= params.gravity * dt;
            }
        }

        apply_damping(&mut self.velocity, damping_factor(params.damping_rate, dt));
    }
}

/// Per-substep physics parameters for bodies, copied out of `SimConfig`.
#[derive(Clone, Copy, Debug)]
pub struct BodyParams {
    pub gravity: f32,
    pub damping_rate: f32,
    pub bounce: f32,
}

impl From<&crate::config::SimConfig> for BodyParams {
    fn from(cfg: &crate::config::SimConfig) -> Self {
        Self {
            gravity: cfg.body_gravity,
            damping_rate: cfg.body_damping_rate,
            bounce: cfg.body_bounce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::SpatialWorld;
    use crate::config::SimConfig;
    use crate::level::flat_floor;
    use approx::assert_relative_eq;

    fn params() -> BodyParams {
        BodyParams::from(&SimConfig::default())
    }

    #[test]
    fn free_fall_applies_gravity_then_damping() {
        let world = SpatialWorld::build(flat_floor(5.0)).unwrap();
        let mut body = DynamicBody::new(BodyId(1), BodyKind::Coin, Vec3::new(0.0, 5.0, 0.0), 0.2);
        let dt = 0.01;
        body.integrate(&world, dt, &params());

        let expected = -30.0 * dt * (-1.5f32 * dt).exp();
        assert_relative_eq!(body.velocity.y, expected, epsilon = 1e-5);
        assert_relative_eq!(body.collider.center.y, 5.0);
    }

    #[test]
    fn landing_projectile_becomes_collectable() {
        let world = SpatialWorld::build(flat_floor(5.0)).unwrap();
        let mut body = DynamicBody::new(BodyId(2), BodyKind::Item, Vec3::zeros(), 0.2);
        body.launch(Vec3::new(1.0, 0.15, -1.5), Vec3::new(0.0, -2.0, 0.0), true);
        assert!(!body.is_collectable());

        body.integrate(&world, 0.001, &params());
        assert!(body.on_ground);
        assert!(!body.being_thrown);
        assert!(body.is_collectable());
        // Reflected with restitution 0.5 and pushed back above the floor.
        assert!(body.velocity.y > 0.0);
        assert!(body.collider.center.y >= 0.2 - 1e-3);
    }

    #[test]
    fn stowed_bodies_are_not_simulated() {
        let mut body = DynamicBody::new(BodyId(3), BodyKind::Coin, Vec3::new(2.0, 1.0, 3.0), 0.2);
        body.visual = Some(VisualHandle(9));
        assert!(body.is_simulated());
        body.stow(-100.0);
        assert!(!body.is_simulated());
        assert!(!body.on_ground);
        assert_eq!(body.collider.center, Vec3::new(2.0, -100.0, 3.0));
    }

    #[test]
    fn balls_are_never_collectable() {
        let body = DynamicBody::new(BodyId(4), BodyKind::Ball, Vec3::zeros(), 0.2);
        assert!(!body.is_collectable());
    }
}
