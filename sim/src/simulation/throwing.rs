use super::SimulationContext;
use crate::body::{BodyId, BodyKind};
use crate::economy::ShopError;
use crate::throw::{find_stowed, launch_from, throw_impulse};
use crate::view::SimEvent;

impl SimulationContext {
    /// Throw the next piece of ammo after charging for `held_secs`.
    ///
    /// Items go before coins. A stowed body of the right kind is reused;
    /// otherwise a fresh one is spawned and simulated once its visual is
    /// attached. Returns `None` (and changes nothing) without ammo.
    pub fn throw_charged(&mut self, held_secs: f32) -> Option<BodyId> {
        if !self.player.alive {
            return None;
        }
        let kind = self.player.state.ammo.next_throwable()?;
        if !self.player.state.ammo.take(kind) {
            return None;
        }

        let impulse = throw_impulse(held_secs, self.config());
        let launch = launch_from(
            &self.player.state.collider,
            self.player.state.velocity,
            self.player.view.forward(),
            impulse,
            self.config(),
        );

        let id = match find_stowed(&self.bodies, kind) {
            Some(index) => {
                let body = &mut self.bodies[index];
                body.launch(launch.center, launch.velocity, true);
                body.id
            }
            None => {
                let mut body = self.make_body(kind, launch.center, launch.velocity, false);
                body.launch(launch.center, launch.velocity, true);
                let id = body.id;
                self.bodies.push(body);
                id
            }
        };

        self.events.push(SimEvent::ThrowSound);
        log::debug!(
            "threw {id} ({kind:?}) at {impulse:.1} m/s after {held_secs:.2}s, {} left",
            self.player.state.ammo.count(kind)
        );
        Some(id)
    }

    /// Launch the next pool ball. Pool balls cost nothing, never damage and
    /// are reused in order, so a long burst recycles balls still in flight.
    pub fn throw_ball(&mut self, held_secs: f32) -> Option<BodyId> {
        if !self.player.alive || self.pool.is_empty() {
            return None;
        }
        let index = self.pool_cursor % self.pool.len();
        self.pool_cursor = (index + 1) % self.pool.len();

        let impulse = throw_impulse(held_secs, self.config());
        let launch = launch_from(
            &self.player.state.collider,
            self.player.state.velocity,
            self.player.view.forward(),
            impulse,
            self.config(),
        );

        let ball = &mut self.pool[index];
        ball.launch(launch.center, launch.velocity, false);
        let id = ball.id;
        self.events.push(SimEvent::ThrowSound);
        log::trace!("threw pool ball {id}");
        Some(id)
    }

    /// Trade coins for one item at the shop.
    ///
    /// Stowed coin bodies are the coins in the player's pocket, so the spent
    /// ones leave the world. The item gets a body when it is first thrown.
    pub fn buy_item(&mut self) -> Result<(), ShopError> {
        self.shop.buy_item(&mut self.player)?;

        let mut spent = self.shop.coin_price;
        let events = &mut self.events;
        self.bodies.retain(|body| {
            if spent == 0 || !body.stowed || body.kind != BodyKind::Coin {
                return true;
            }
            spent -= 1;
            events.push(SimEvent::BodyDespawned { body: body.id });
            false
        });
        Ok(())
    }
}
