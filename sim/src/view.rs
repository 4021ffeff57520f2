//! Boundary to the presentation layer.
//!
//! The simulation never calls into rendering, audio or UI directly. It queues
//! [`SimEvent`]s while stepping and hands them to a [`WorldView`] once the
//! frame is done. Visual objects are referred to by opaque [`VisualHandle`]s
//! that the view attaches after it has created (or finished loading) them.

use crate::actor::MobId;
use crate::body::{BodyId, BodyKind};
use crate::collision::Vec3;

/// Opaque id of a visual owned by the view layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Receiver of one-way simulation notifications.
///
/// Only the four gameplay notifications are required; the lifecycle hooks
/// default to doing nothing for views that create visuals eagerly.
pub trait WorldView {
    fn notify_mob_killed(&mut self, mob: MobId, position: Vec3);
    fn notify_item_collected(&mut self, body: BodyId);
    fn notify_player_died(&mut self);
    fn notify_throw_sound(&mut self);

    /// A body entered the world and needs a visual.
    fn notify_body_spawned(&mut self, _body: BodyId, _kind: BodyKind, _position: Vec3) {}

    /// A body left the world; its visual can be dropped.
    fn notify_body_despawned(&mut self, _body: BodyId) {}

    /// A mob entered the world and needs a visual.
    fn notify_mob_spawned(&mut self, _mob: MobId, _position: Vec3) {}
}

/// Something that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    MobKilled { mob: MobId, position: Vec3 },
    ItemCollected { body: BodyId },
    PlayerDied,
    ThrowSound,
    BodySpawned { body: BodyId, kind: BodyKind, position: Vec3 },
    BodyDespawned { body: BodyId },
    MobSpawned { mob: MobId, position: Vec3 },
}

impl SimEvent {
    pub fn dispatch<V: WorldView + ?Sized>(self, view: &mut V) {
        match self {
            SimEvent::MobKilled { mob, position } => view.notify_mob_killed(mob, position),
            SimEvent::ItemCollected { body } => view.notify_item_collected(body),
            SimEvent::PlayerDied => view.notify_player_died(),
            SimEvent::ThrowSound => view.notify_throw_sound(),
            SimEvent::BodySpawned {
                body,
                kind,
                position,
            } => view.notify_body_spawned(body, kind, position),
            SimEvent::BodyDespawned { body } => view.notify_body_despawned(body),
            SimEvent::MobSpawned { mob, position } => view.notify_mob_spawned(mob, position),
        }
    }
}

/// Records every notification. Useful for replays, logging and tests.
impl WorldView for Vec<SimEvent> {
    fn notify_mob_killed(&mut self, mob: MobId, position: Vec3) {
        self.push(SimEvent::MobKilled { mob, position });
    }

    fn notify_item_collected(&mut self, body: BodyId) {
        self.push(SimEvent::ItemCollected { body });
    }

    fn notify_player_died(&mut self) {
        self.push(SimEvent::PlayerDied);
    }

    fn notify_throw_sound(&mut self) {
        self.push(SimEvent::ThrowSound);
    }

    fn notify_body_spawned(&mut self, body: BodyId, kind: BodyKind, position: Vec3) {
        self.push(SimEvent::BodySpawned {
            body,
            kind,
            position,
        });
    }

    fn notify_body_despawned(&mut self, body: BodyId) {
        self.push(SimEvent::BodyDespawned { body });
    }

    fn notify_mob_spawned(&mut self, mob: MobId, position: Vec3) {
        self.push(SimEvent::MobSpawned { mob, position });
    }
}
