//! Gameplay and physics tunables.
//!
//! Every field defaults to the matching value in [`crate::constants`]. A JSON
//! file only needs to name the fields it changes.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub steps_per_frame: u32,
    pub max_frame_dt: f32,

    pub player_gravity: f32,
    pub mob_gravity: f32,
    pub body_gravity: f32,

    pub ground_accel: f32,
    pub air_accel: f32,
    pub jump_speed: f32,
    pub actor_damping_rate: f32,
    pub air_damping_factor: f32,
    pub body_damping_rate: f32,
    pub body_bounce: f32,

    pub mob_speed: f32,
    pub player_mob_push_distance: f32,
    pub mob_mob_push_distance: f32,

    pub throw_base_impulse: f32,
    pub throw_charge_impulse: f32,
    pub max_charge_secs: f32,
    pub throw_inherit_factor: f32,
    pub throw_damage: i32,

    pub mob_health: i32,
    pub player_health: i32,
    pub mob_contact_damage: i32,
    pub mob_attack_cooldown: f32,
    pub start_coin_ammo: u32,
    pub start_item_ammo: u32,

    pub out_of_bounds_y: f32,
    pub stow_y: f32,

    pub loot_count: u32,
    pub loot_coin_count: u32,
    pub loot_ring_radius: f32,
    pub loot_speed: f32,

    pub body_radius: f32,
    pub actor_radius: f32,
    pub actor_segment_height: f32,
    pub mouse_pixels_per_radian: f32,

    pub mob_spawn_interval: f32,
    pub mob_max_alive: u32,

    pub shop_reach: f32,
    pub shop_coin_price: u32,
    pub shop_stock: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps_per_frame: STEPS_PER_FRAME,
            max_frame_dt: MAX_FRAME_DT,
            player_gravity: PLAYER_GRAVITY,
            mob_gravity: MOB_GRAVITY,
            body_gravity: BODY_GRAVITY,
            ground_accel: GROUND_ACCEL,
            air_accel: AIR_ACCEL,
            jump_speed: JUMP_SPEED,
            actor_damping_rate: ACTOR_DAMPING_RATE,
            air_damping_factor: AIR_DAMPING_FACTOR,
            body_damping_rate: BODY_DAMPING_RATE,
            body_bounce: BODY_BOUNCE,
            mob_speed: MOB_SPEED,
            player_mob_push_distance: PLAYER_MOB_PUSH_DISTANCE,
            mob_mob_push_distance: MOB_MOB_PUSH_DISTANCE,
            throw_base_impulse: THROW_BASE_IMPULSE,
            throw_charge_impulse: THROW_CHARGE_IMPULSE,
            max_charge_secs: MAX_CHARGE_SECS,
            throw_inherit_factor: THROW_INHERIT_FACTOR,
            throw_damage: THROW_DAMAGE,
            mob_health: MOB_HEALTH,
            player_health: PLAYER_HEALTH,
            mob_contact_damage: MOB_CONTACT_DAMAGE,
            mob_attack_cooldown: MOB_ATTACK_COOLDOWN,
            start_coin_ammo: START_COIN_AMMO,
            start_item_ammo: START_ITEM_AMMO,
            out_of_bounds_y: OUT_OF_BOUNDS_Y,
            stow_y: STOW_Y,
            loot_count: LOOT_COUNT,
            loot_coin_count: LOOT_COIN_COUNT,
            loot_ring_radius: LOOT_RING_RADIUS,
            loot_speed: LOOT_SPEED,
            body_radius: BODY_RADIUS,
            actor_radius: ACTOR_RADIUS,
            actor_segment_height: ACTOR_SEGMENT_HEIGHT,
            mouse_pixels_per_radian: MOUSE_PIXELS_PER_RADIAN,
            mob_spawn_interval: MOB_SPAWN_INTERVAL,
            mob_max_alive: MOB_MAX_ALIVE,
            shop_reach: SHOP_REACH,
            shop_coin_price: SHOP_COIN_PRICE,
            shop_stock: SHOP_STOCK,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the step loop divide by zero, produce
    /// NaNs or never terminate.
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_frame == 0 {
            return Err(invalid("steps_per_frame", "must be at least 1"));
        }

        let positive = [
            ("max_frame_dt", self.max_frame_dt),
            ("body_radius", self.body_radius),
            ("actor_radius", self.actor_radius),
            ("mouse_pixels_per_radian", self.mouse_pixels_per_radian),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be finite and > 0, got {value}")));
            }
        }

        let non_negative = [
            ("player_gravity", self.player_gravity),
            ("mob_gravity", self.mob_gravity),
            ("body_gravity", self.body_gravity),
            ("ground_accel", self.ground_accel),
            ("air_accel", self.air_accel),
            ("jump_speed", self.jump_speed),
            ("actor_damping_rate", self.actor_damping_rate),
            ("air_damping_factor", self.air_damping_factor),
            ("body_damping_rate", self.body_damping_rate),
            ("body_bounce", self.body_bounce),
            ("mob_speed", self.mob_speed),
            ("player_mob_push_distance", self.player_mob_push_distance),
            ("mob_mob_push_distance", self.mob_mob_push_distance),
            ("throw_base_impulse", self.throw_base_impulse),
            ("throw_charge_impulse", self.throw_charge_impulse),
            ("max_charge_secs", self.max_charge_secs),
            ("throw_inherit_factor", self.throw_inherit_factor),
            ("mob_attack_cooldown", self.mob_attack_cooldown),
            ("actor_segment_height", self.actor_segment_height),
            ("loot_ring_radius", self.loot_ring_radius),
            ("loot_speed", self.loot_speed),
            ("mob_spawn_interval", self.mob_spawn_interval),
            ("shop_reach", self.shop_reach),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be finite and >= 0, got {value}")));
            }
        }

        if !self.out_of_bounds_y.is_finite() || !self.stow_y.is_finite() {
            return Err(invalid("out_of_bounds_y", "heights must be finite"));
        }
        if self.stow_y >= self.out_of_bounds_y {
            // Parked bodies are skipped by physics, but keep them visibly out of play.
            log::warn!(
                "stow_y ({}) is above out_of_bounds_y ({})",
                self.stow_y,
                self.out_of_bounds_y
            );
        }
        if self.loot_coin_count > self.loot_count {
            return Err(invalid(
                "loot_coin_count",
                format!("exceeds loot_count ({})", self.loot_count),
            ));
        }
        if self.mob_health <= 0 {
            return Err(invalid("mob_health", "must be positive"));
        }
        if self.player_health <= 0 {
            return Err(invalid("player_health", "must be positive"));
        }

        Ok(())
    }

    /// Substep length for a frame of `frame_dt` seconds.
    ///
    /// Negative or NaN frame deltas count as zero.
    #[inline]
    pub fn substep_dt(&self, frame_dt: f32) -> f32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        frame_dt.min(self.max_frame_dt) / self.steps_per_frame.max(1) as f32
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json_str(r#"{ "throw_damage": 50, "mob_speed": 2.5 }"#).unwrap();
        assert_eq!(cfg.throw_damage, 50);
        assert_relative_eq!(cfg.mob_speed, 2.5);
        assert_eq!(cfg.steps_per_frame, STEPS_PER_FRAME);
        assert_relative_eq!(cfg.player_gravity, PLAYER_GRAVITY);
    }

    #[test]
    fn rejects_zero_substeps() {
        let err = SimConfig::from_json_str(r#"{ "steps_per_frame": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                field: "steps_per_frame",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn substep_dt_clamps_long_frames() {
        let cfg = SimConfig::default();
        assert_relative_eq!(cfg.substep_dt(0.016), 0.016 / 5.0);
        assert_relative_eq!(cfg.substep_dt(2.0), 0.05 / 5.0);
        assert_relative_eq!(cfg.substep_dt(-1.0), 0.0);
        assert_relative_eq!(cfg.substep_dt(f32::NAN), 0.0);
    }
}
