//! Headless runner: plays a scripted round in the demo arena and logs what
//! happens. Set `RUST_LOG=debug` (or `trace`) for per-throw and per-frame
//! detail.
//!
//! Usage: `arena-headless [config.json]`

use std::error::Error;

use arena_sim::{
    BodyId, BodyKind, InputState, Key, MobId, SimConfig, SimulationContext, Vec3, VisualHandle,
    WorldView,
};

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 60 * 45;
const POOL_BALLS: usize = 32;

/// Stands in for the renderer: hands out visual handles for everything the
/// simulation spawns and keeps a tally for the summary.
#[derive(Default)]
struct LoggingView {
    next_handle: u64,
    new_bodies: Vec<BodyId>,
    new_mobs: Vec<MobId>,
    collected: u32,
    kills: u32,
    throws: u32,
    player_died: bool,
}

impl LoggingView {
    fn handle(&mut self) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }

    /// Attach visuals to everything spawned during the last frame.
    fn attach_pending(&mut self, ctx: &mut SimulationContext) {
        for id in std::mem::take(&mut self.new_bodies) {
            let handle = self.handle();
            ctx.attach_body_visual(id, handle);
        }
        for id in std::mem::take(&mut self.new_mobs) {
            let handle = self.handle();
            ctx.attach_mob_visual(id, handle);
        }
    }
}

impl WorldView for LoggingView {
    fn notify_mob_killed(&mut self, mob: MobId, position: Vec3) {
        self.kills += 1;
        log::info!("{mob} died at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
    }

    fn notify_item_collected(&mut self, body: BodyId) {
        self.collected += 1;
        log::debug!("picked up {body}");
    }

    fn notify_player_died(&mut self) {
        self.player_died = true;
        log::info!("player died");
    }

    fn notify_throw_sound(&mut self) {
        self.throws += 1;
    }

    fn notify_body_spawned(&mut self, body: BodyId, kind: BodyKind, _position: Vec3) {
        log::trace!("{body} ({kind:?}) needs a visual");
        self.new_bodies.push(body);
    }

    fn notify_body_despawned(&mut self, body: BodyId) {
        log::trace!("{body} removed");
    }

    fn notify_mob_spawned(&mut self, mob: MobId, _position: Vec3) {
        self.new_mobs.push(mob);
    }
}

/// Input for `frame`: circle-strafe forward while turning, hop now and then,
/// charge a throw for half a second every two seconds.
fn scripted_input(frame: u32) -> InputState {
    let mut input = InputState::default();
    input.set(Key::Forward, frame % 240 < 180);
    input.set(Key::Left, frame % 480 >= 240);
    input.set(Key::Jump, frame % 150 == 0);
    input.set(Key::Throw, frame % 120 >= 90);
    input.mouse_delta = (4.0, if frame % 600 < 300 { 0.5 } else { -0.5 });
    input
}

fn load_config() -> Result<SimConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let config = SimConfig::from_json_str(&json)?;
            log::info!("loaded config from {path}");
            Ok(config)
        }
        None => Ok(SimConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    let mut ctx = SimulationContext::demo(config)?;
    ctx.fill_pool(POOL_BALLS);

    let mut view = LoggingView::default();
    for frame in 0..FRAMES {
        let input = scripted_input(frame);
        ctx.step(FRAME_DT, &input, &mut view);
        view.attach_pending(&mut ctx);

        if frame % 300 == 150 {
            ctx.throw_ball(0.0);
        }
        if frame % 600 == 599 {
            if let Err(err) = ctx.buy_item() {
                log::debug!("shop: {err}");
            }
            let p = ctx.player.state.center();
            log::info!(
                "t={:.1}s pos=({:.1}, {:.1}, {:.1}) hp={} ammo={:?} mobs={} bodies={}",
                ctx.clock(),
                p.x,
                p.y,
                p.z,
                ctx.player.state.health,
                ctx.player.state.ammo,
                ctx.alive_mobs(),
                ctx.bodies.len()
            );
        }
        if view.player_died {
            break;
        }
    }

    log::info!(
        "round over after {:.1}s: {} throws, {} pickups, {} kills, player {}",
        ctx.clock(),
        view.throws,
        view.collected,
        view.kills,
        if ctx.is_running() { "alive" } else { "dead" }
    );
    Ok(())
}
