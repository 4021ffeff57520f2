use super::pending::PendingChanges;
use crate::actor::{Mob, MobId, Player};
use crate::body::{BodyId, BodyKind, DynamicBody};
use crate::collision::{SpatialWorld, Vec3};
use crate::config::SimConfig;
use crate::economy::{DEFAULT_SHOP_POSITION, Shop};
use crate::error::Result;
use crate::level;
use crate::spawn::MobSpawner;
use crate::view::{SimEvent, VisualHandle};

/// Everything one running round owns.
///
/// The level is immutable after construction; every other collection is
/// mutated only from [`SimulationContext::step`] or the explicit spawn and
/// attach calls below. Events produced outside `step` (spawns, throws made
/// directly through the API) are delivered with the next frame.
pub struct SimulationContext {
    pub(super) world: SpatialWorld,
    pub(super) config: SimConfig,
    pub player: Player,
    pub mobs: Vec<Mob>,
    /// Coins and items, loose, in flight or stowed.
    pub bodies: Vec<DynamicBody>,
    /// Pool balls, recycled by [`SimulationContext::throw_ball`].
    pub pool: Vec<DynamicBody>,
    pub spawner: MobSpawner,
    pub shop: Shop,
    pub(super) pending: PendingChanges,
    pub(super) events: Vec<SimEvent>,
    pub(super) clock: f32,
    pub(super) pool_cursor: usize,
    next_body_id: u32,
    next_mob_id: u32,
}

impl SimulationContext {
    /// Start a round on `world`. Fails when `config` does not validate.
    pub fn new(world: SpatialWorld, config: SimConfig) -> Result<Self> {
        config.validate()?;

        let player = Player::new(&config);
        let spawner = MobSpawner::with_default_points(&config);
        let shop = Shop::new(Vec3::from(DEFAULT_SHOP_POSITION), &config);
        log::info!(
            "simulation ready: {} triangles, {} substeps per frame",
            world.triangle_count(),
            config.steps_per_frame
        );

        Ok(Self {
            world,
            config,
            player,
            mobs: Vec::new(),
            bodies: Vec::new(),
            pool: Vec::new(),
            spawner,
            shop,
            pending: PendingChanges::default(),
            events: Vec::new(),
            clock: 0.0,
            pool_cursor: 0,
            next_body_id: 1,
            next_mob_id: 1,
        })
    }

    /// A round in the built-in demo arena.
    pub fn demo(config: SimConfig) -> Result<Self> {
        let world = SpatialWorld::build(level::demo_arena())?;
        Self::new(world, config)
    }

    #[inline]
    pub fn world(&self) -> &SpatialWorld {
        &self.world
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulated seconds since the round started.
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// False once the player has died; `step` is a no-op from then on.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.player.alive
    }

    /// Look up a body in either the coin/item list or the ball pool.
    pub fn body(&self, id: BodyId) -> Option<&DynamicBody> {
        self.bodies.iter().chain(self.pool.iter()).find(|b| b.id == id)
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.iter().find(|m| m.id == id)
    }

    pub fn alive_mobs(&self) -> usize {
        self.mobs.iter().filter(|m| m.alive).count()
    }

    /// Add a mob standing on `base`. Without a visual it stays frozen until
    /// [`attach_mob_visual`](Self::attach_mob_visual) is called.
    pub fn spawn_mob(&mut self, base: Vec3, visual: Option<VisualHandle>) -> MobId {
        let id = MobId(self.next_mob_id);
        self.next_mob_id += 1;

        let mut mob = Mob::new(id, base, &self.config);
        mob.visual = visual;
        log::info!("spawned {id} at ({:.1}, {:.1}, {:.1})", base.x, base.y, base.z);
        self.events.push(SimEvent::MobSpawned {
            mob: id,
            position: mob.position(),
        });
        self.mobs.push(mob);
        id
    }

    /// Add a body to the world immediately. Balls go to the pool, everything
    /// else to the coin/item list.
    pub fn spawn_body(
        &mut self,
        kind: BodyKind,
        center: Vec3,
        velocity: Vec3,
        on_ground: bool,
    ) -> BodyId {
        let body = self.make_body(kind, center, velocity, on_ground);
        let id = body.id;
        match kind {
            BodyKind::Ball => self.pool.push(body),
            BodyKind::Coin | BodyKind::Item => self.bodies.push(body),
        }
        id
    }

    /// Create `count` stowed pool balls for [`throw_ball`](Self::throw_ball).
    pub fn fill_pool(&mut self, count: usize) {
        let parked = Vec3::new(0.0, self.config.stow_y, 0.0);
        for _ in 0..count {
            let mut ball = self.make_body(BodyKind::Ball, parked, Vec3::zeros(), false);
            ball.stow(self.config.stow_y);
            self.pool.push(ball);
        }
        log::debug!("ball pool holds {} balls", self.pool.len());
    }

    /// Hand a body its visual; it is simulated from the next substep on.
    pub fn attach_body_visual(&mut self, id: BodyId, visual: VisualHandle) -> bool {
        let found = self
            .bodies
            .iter_mut()
            .chain(self.pool.iter_mut())
            .find(|b| b.id == id);
        match found {
            Some(body) => {
                body.visual = Some(visual);
                true
            }
            None => {
                log::warn!("attach_body_visual: unknown {id}");
                false
            }
        }
    }

    pub fn attach_mob_visual(&mut self, id: MobId, visual: VisualHandle) -> bool {
        match self.mobs.iter_mut().find(|m| m.id == id) {
            Some(mob) => {
                mob.visual = Some(visual);
                true
            }
            None => {
                log::warn!("attach_mob_visual: unknown {id}");
                false
            }
        }
    }

    /// Allocate an id and queue the spawn notification. The caller decides
    /// which list the body goes into.
    pub(super) fn make_body(
        &mut self,
        kind: BodyKind,
        center: Vec3,
        velocity: Vec3,
        on_ground: bool,
    ) -> DynamicBody {
        let id = BodyId(self.next_body_id);
        self.next_body_id += 1;

        let mut body = DynamicBody::new(id, kind, center, self.config.body_radius);
        body.velocity = velocity;
        body.on_ground = on_ground;
        self.events.push(SimEvent::BodySpawned {
            body: id,
            kind,
            position: center,
        });
        body
    }
}
