use std::f32::consts::TAU;

use super::SimulationContext;
use crate::actor::MobId;
use crate::body::{BodyId, BodyKind, BodyParams};
use crate::collision::{
    Vec3, capsule_sphere_contacts, capsule_sphere_overlap, push_apart, resolve_sphere_pairs,
};
use crate::input::InputState;
use crate::view::{SimEvent, WorldView};

impl SimulationContext {
    /// Advance one rendered frame.
    ///
    /// Applies the mouse look and throw button, runs `steps_per_frame` fixed
    /// substeps, ticks the mob spawner, then delivers every queued event to
    /// `view`. Once the player is dead only the event delivery runs.
    pub fn step<V>(&mut self, frame_dt: f32, input: &InputState, view: &mut V)
    where
        V: WorldView + ?Sized,
    {
        if self.player.alive {
            let pixels_per_radian = self.config().mouse_pixels_per_radian;
            self.player.view.apply_mouse(input.mouse_delta, pixels_per_radian);

            if let Some(start) = self.player.track_throw_button(input.throw, self.clock) {
                self.throw_charged(self.clock - start);
            }

            let dt = self.config().substep_dt(frame_dt);
            let steps = self.config().steps_per_frame;
            for _ in 0..steps {
                self.substep(input, dt);
            }

            let alive = self.alive_mobs();
            if let Some(point) = self.spawner.tick(dt * steps as f32, alive) {
                self.spawn_mob(point, None);
            }
        }

        self.flush_events(view);
    }

    fn substep(&mut self, input: &InputState, dt: f32) {
        self.clock += dt;
        self.update_player(input, dt);
        self.update_mobs(dt);
        self.update_bodies(dt);
        self.update_pool(dt);
        self.apply_pending();
    }

    fn update_player(&mut self, input: &InputState, dt: f32) {
        let config = &self.config;
        self.player.update(input, dt, &self.world, config);

        // Mobs push the player out of their personal space and hurt it while
        // they are that close.
        let center = self.player.state.center();
        let mut push = Vec3::zeros();
        for mob in self.mobs.iter_mut().filter(|m| m.is_simulated()) {
            let offset = push_apart(&center, &mob.state.center(), config.player_mob_push_distance);
            if offset == Vec3::zeros() {
                continue;
            }
            push += offset;
            if mob.try_attack(config.mob_attack_cooldown)
                && self.player.take_damage(config.mob_contact_damage)
            {
                log::info!("player killed by {}", mob.id);
                self.events.push(SimEvent::PlayerDied);
            }
        }
        self.player.state.nudge(push);

        if self.player.state.respawn_if_out_of_bounds(config.out_of_bounds_y) {
            log::debug!("player fell out of the level, back at spawn");
        }
    }

    fn update_mobs(&mut self, dt: f32) {
        let config = &self.config;
        let target = self.player.state.center();
        for mob in self.mobs.iter_mut().filter(|m| m.is_simulated()) {
            mob.update(target, dt, &self.world, config);
        }

        for i in 0..self.mobs.len() {
            if !self.mobs[i].is_simulated() {
                continue;
            }
            let center = self.mobs[i].state.center();
            let push = self
                .mobs
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && other.is_simulated())
                .fold(Vec3::zeros(), |acc, (_, other)| {
                    acc + push_apart(&center, &other.state.center(), config.mob_mob_push_distance)
                });

            let mob = &mut self.mobs[i];
            mob.state.nudge(push);
            if mob.state.respawn_if_out_of_bounds(config.out_of_bounds_y) {
                log::debug!("{} fell out of the level, back at spawn", mob.id);
            }
        }
    }

    /// Coins and items: integrate, pickups, projectile hits, then pairwise
    /// sphere resolution.
    fn update_bodies(&mut self, dt: f32) {
        let config = &self.config;
        let params = BodyParams::from(config);
        let mut kills: Vec<(MobId, Vec3)> = Vec::new();
        let mut gone: Vec<BodyId> = Vec::new();

        for body in self.bodies.iter_mut().filter(|b| b.is_simulated()) {
            body.integrate(&self.world, dt, &params);
            if body.collider.center.y < config.out_of_bounds_y {
                gone.push(body.id);
                continue;
            }

            let player = &mut self.player.state;
            if body.is_collectable() && capsule_sphere_overlap(&player.collider, &body.collider) {
                player.ammo.add(body.kind);
                body.stow(config.stow_y);
                log::debug!("collected {} ({:?}), now {:?}", body.id, body.kind, player.ammo);
                self.events.push(SimEvent::ItemCollected { body: body.id });
                continue;
            }
            capsule_sphere_contacts(
                &player.collider,
                &mut player.velocity,
                &mut body.collider,
                &mut body.velocity,
            );

            for mob in self.mobs.iter_mut().filter(|m| m.is_simulated()) {
                let touching = capsule_sphere_contacts(
                    &mob.state.collider,
                    &mut mob.state.velocity,
                    &mut body.collider,
                    &mut body.velocity,
                ) > 0;
                if !touching || !body.being_thrown {
                    continue;
                }

                body.being_thrown = false;
                if mob.take_damage(config.throw_damage) {
                    kills.push((mob.id, mob.position()));
                } else {
                    log::debug!("{} hit {}, {} hp left", body.id, mob.id, mob.hp());
                }
                if body.kind == BodyKind::Coin {
                    gone.push(body.id);
                    break;
                }
            }
        }

        for (mob, position) in kills {
            self.drop_loot(position);
            self.player.kills += 1;
            log::info!("{mob} killed, {} kills", self.player.kills);
            self.events.push(SimEvent::MobKilled { mob, position });
        }
        for body in gone {
            self.pending.despawn_bodies.push(body);
            self.events.push(SimEvent::BodyDespawned { body });
        }

        resolve_sphere_pairs(&mut self.bodies);
    }

    /// Pool balls: same physics as coins and items, without pickups or damage.
    fn update_pool(&mut self, dt: f32) {
        let config = &self.config;
        let params = BodyParams::from(config);

        for ball in self.pool.iter_mut().filter(|b| b.is_simulated()) {
            ball.integrate(&self.world, dt, &params);
            if ball.collider.center.y < config.out_of_bounds_y {
                ball.stow(config.stow_y);
                continue;
            }
            let player = &mut self.player.state;
            capsule_sphere_contacts(
                &player.collider,
                &mut player.velocity,
                &mut ball.collider,
                &mut ball.velocity,
            );
            for mob in self.mobs.iter_mut().filter(|m| m.is_simulated()) {
                capsule_sphere_contacts(
                    &mob.state.collider,
                    &mut mob.state.velocity,
                    &mut ball.collider,
                    &mut ball.velocity,
                );
            }
        }

        resolve_sphere_pairs(&mut self.pool);
    }

    /// Queue the loot ring around `origin`: evenly spaced on the XZ circle,
    /// flying outward, coins first.
    fn drop_loot(&mut self, origin: Vec3) {
        let count = self.config().loot_count;
        let coins = self.config().loot_coin_count;
        let ring_radius = self.config().loot_ring_radius;
        let speed = self.config().loot_speed;

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let kind = if i < coins {
                BodyKind::Coin
            } else {
                BodyKind::Item
            };
            let loot = self.make_body(kind, origin + dir * ring_radius, dir * speed, true);
            self.pending.spawn_bodies.push(loot);
        }
    }

    /// Compact dead mobs and removed bodies, then append queued spawns.
    fn apply_pending(&mut self) {
        self.mobs.retain(|m| m.alive);
        if self.pending.is_empty() {
            return;
        }

        let changes = std::mem::take(&mut self.pending);
        if !changes.despawn_bodies.is_empty() {
            self.bodies.retain(|b| !changes.despawn_bodies.contains(&b.id));
        }
        self.bodies.extend(changes.spawn_bodies);
    }

    fn flush_events<V>(&mut self, view: &mut V)
    where
        V: WorldView + ?Sized,
    {
        if self.events.is_empty() {
            return;
        }
        log::trace!("dispatching {} events at t={:.3}", self.events.len(), self.clock);
        for event in self.events.drain(..) {
            event.dispatch(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::SpatialWorld;
    use crate::config::SimConfig;
    use crate::level::flat_floor;
    use crate::view::VisualHandle;
    use approx::assert_relative_eq;

    const FRAME: f32 = 1.0 / 60.0;

    fn context() -> SimulationContext {
        let world = SpatialWorld::build(flat_floor(20.0)).unwrap();
        let config = SimConfig {
            mob_spawn_interval: 0.0,
            ..SimConfig::default()
        };
        let mut ctx = SimulationContext::new(world, config).unwrap();
        ctx.player.state.collider = ctx.player.state.respawn;
        ctx
    }

    #[test]
    fn clock_advances_by_the_capped_frame() {
        let mut ctx = context();
        let mut events = Vec::new();
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert_relative_eq!(ctx.clock(), FRAME, epsilon = 1e-6);
        ctx.step(1.0, &InputState::default(), &mut events);
        assert_relative_eq!(ctx.clock(), FRAME + 0.05, epsilon = 1e-5);
        ctx.step(f32::NAN, &InputState::default(), &mut events);
        assert_relative_eq!(ctx.clock(), FRAME + 0.05, epsilon = 1e-5);
    }

    #[test]
    fn releasing_throw_button_throws() {
        let mut ctx = context();
        let mut events = Vec::new();
        let items = ctx.player.state.ammo.items;
        let held = InputState {
            throw: true,
            ..Default::default()
        };
        ctx.step(FRAME, &held, &mut events);
        ctx.step(FRAME, &held, &mut events);
        assert!(!events.contains(&SimEvent::ThrowSound));

        ctx.step(FRAME, &InputState::default(), &mut events);
        assert!(events.contains(&SimEvent::ThrowSound));
        assert_eq!(ctx.player.state.ammo.items, items - 1);
    }

    #[test]
    fn mob_contact_hurts_with_cooldown() {
        let mut ctx = context();
        let mut events = Vec::new();
        let health = ctx.player.state.health;
        ctx.spawn_mob(Vec3::new(0.5, 0.0, 0.0), Some(VisualHandle(1)));

        ctx.step(FRAME, &InputState::default(), &mut events);
        assert_eq!(ctx.player.state.health, health - 1);
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert_eq!(ctx.player.state.health, health - 1);
    }

    #[test]
    fn player_death_stops_the_round() {
        let mut ctx = context();
        let mut events = Vec::new();
        ctx.player.state.health = 1;
        ctx.spawn_mob(Vec3::new(0.5, 0.0, 0.0), Some(VisualHandle(1)));

        ctx.step(FRAME, &InputState::default(), &mut events);
        assert!(!ctx.is_running());
        let deaths = events.iter().filter(|e| **e == SimEvent::PlayerDied).count();
        assert_eq!(deaths, 1);

        let clock = ctx.clock();
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert_eq!(ctx.clock(), clock);
        let deaths = events.iter().filter(|e| **e == SimEvent::PlayerDied).count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn mobs_keep_their_distance() {
        let mut ctx = context();
        let mut events = Vec::new();
        let a = ctx.spawn_mob(Vec3::new(6.0, 0.0, 6.0), Some(VisualHandle(1)));
        let b = ctx.spawn_mob(Vec3::new(6.5, 0.0, 6.0), Some(VisualHandle(2)));
        ctx.step(FRAME, &InputState::default(), &mut events);

        let pa = ctx.mob(a).unwrap().state.center();
        let pb = ctx.mob(b).unwrap().state.center();
        assert!((pa - pb).norm() >= 2.0 - 1e-3);
    }

    #[test]
    fn unvisualised_bodies_are_frozen() {
        let mut ctx = context();
        let mut events = Vec::new();
        let id = ctx.spawn_body(BodyKind::Coin, Vec3::new(3.0, 2.0, 3.0), Vec3::zeros(), true);
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert_eq!(ctx.body(id).unwrap().collider.center, Vec3::new(3.0, 2.0, 3.0));

        ctx.attach_body_visual(id, VisualHandle(5));
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert!(ctx.body(id).unwrap().collider.center.y < 2.0);
    }

    #[test]
    fn falling_body_is_despawned() {
        let mut ctx = context();
        let mut events = Vec::new();
        let start = Vec3::new(30.0, -24.99, 30.0);
        let id = ctx.spawn_body(BodyKind::Item, start, Vec3::new(0.0, -10.0, 0.0), false);
        ctx.attach_body_visual(id, VisualHandle(3));
        ctx.step(FRAME, &InputState::default(), &mut events);
        assert!(ctx.body(id).is_none());
        assert!(events.contains(&SimEvent::BodyDespawned { body: id }));
    }
}
