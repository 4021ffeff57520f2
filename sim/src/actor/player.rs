use super::{ActorParams, ActorState, Ammo};
use crate::collision::{Capsule, CollisionWorld, Vec3};
use crate::config::SimConfig;
use crate::input::{InputState, ViewAngles};

/// Height of the player's first spawn. They drop onto the level from here.
const INITIAL_DROP_HEIGHT: f32 = 10.0;

/// The first-person player.
#[derive(Clone, Debug)]
pub struct Player {
    pub state: ActorState,
    pub view: ViewAngles,
    /// Simulation time (seconds) at which the current throw charge began.
    pub throw_charge_start: Option<f32>,
    pub alive: bool,
    pub kills: u32,
    throw_was_held: bool,
}

impl Player {
    pub fn new(cfg: &SimConfig) -> Self {
        let radius = cfg.actor_radius;
        let respawn = Capsule::upright(Vec3::new(0.0, radius, 0.0), cfg.actor_segment_height, radius);
        let mut collider = respawn;
        collider.translate(Vec3::new(0.0, INITIAL_DROP_HEIGHT, 0.0));

        let mut state = ActorState::new(collider, respawn, cfg.player_health);
        state.ammo = Ammo {
            coins: cfg.start_coin_ammo,
            items: cfg.start_item_ammo,
        };

        Self {
            state,
            view: ViewAngles::default(),
            throw_charge_start: None,
            alive: true,
            kills: 0,
            throw_was_held: false,
        }
    }

    /// Eye position: the upper capsule endpoint.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.state.collider.end
    }

    /// Turn keys into velocity. Movement is camera-relative on the XZ plane and
    /// weaker in the air; jumping only works from the floor.
    pub fn apply_controls(&mut self, input: &InputState, dt: f32, cfg: &SimConfig) {
        let accel = if self.state.on_floor {
            cfg.ground_accel
        } else {
            cfg.air_accel
        };
        let speed_delta = dt * accel;

        let forward = self.view.horizontal_forward();
        let side = self.view.side();
        self.state.velocity += forward * (input.forward_axis() * speed_delta);
        self.state.velocity += side * (input.side_axis() * speed_delta);

        if self.state.on_floor && input.jump {
            self.state.velocity.y = cfg.jump_speed;
        }
    }

    /// Input, integration and world collision for one substep.
    pub fn update<W>(&mut self, input: &InputState, dt: f32, world: &W, cfg: &SimConfig)
    where
        W: CollisionWorld + ?Sized,
    {
        self.apply_controls(input, dt, cfg);
        self.state.integrate(dt, &ActorParams::player(cfg));
        self.state.collide_world(world);
    }

    /// Track the throw button. Returns the charge start time when the button
    /// was just released after a press.
    pub fn track_throw_button(&mut self, held: bool, now: f32) -> Option<f32> {
        let was_held = std::mem::replace(&mut self.throw_was_held, held);
        match (was_held, held) {
            (false, true) => {
                self.throw_charge_start = Some(now);
                None
            }
            (true, false) => self.throw_charge_start.take(),
            _ => None,
        }
    }

    /// Apply damage. Returns true when this hit killed the player.
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
}
