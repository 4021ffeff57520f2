//! Charged throws.
//!
//! Holding the throw button charges the impulse along a saturating curve:
//! `base + charge * (1 - exp(-t))` for `t` seconds held. The projectile
//! leaves from just in front of the thrower's eye and inherits a multiple of
//! the thrower's own velocity.

use crate::body::{BodyKind, DynamicBody};
use crate::collision::{Capsule, Vec3};
use crate::config::SimConfig;

/// Impulse (m/s) for a throw charged for `held_secs`.
///
/// Monotonically non-decreasing in `held_secs` and always within
/// `[base, base + charge)`. Negative or NaN hold times count as zero; hold
/// times past `max_charge_secs` count as `max_charge_secs`.
pub fn throw_impulse(held_secs: f32, cfg: &SimConfig) -> f32 {
    let t = if held_secs.is_finite() {
        held_secs.clamp(0.0, cfg.max_charge_secs)
    } else if held_secs == f32::INFINITY {
        cfg.max_charge_secs
    } else {
        0.0
    };
    cfg.throw_base_impulse + cfg.throw_charge_impulse * (1.0 - (-t).exp())
}

/// Spawn pose and velocity of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub center: Vec3,
    pub velocity: Vec3,
}

/// Place a projectile two capsule radii in front of `capsule.end`.
///
/// `forward` does not need to be normalised; a zero or non-finite forward
/// falls back to -Z.
pub fn launch_from(
    capsule: &Capsule,
    actor_velocity: Vec3,
    forward: Vec3,
    impulse: f32,
    cfg: &SimConfig,
) -> Launch {
    let forward = forward
        .try_normalize(crate::constants::DIR_EPS_SQ.sqrt())
        .filter(|f| f.iter().all(|v| v.is_finite()))
        .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));

    let center = capsule.end + forward * (capsule.radius * 2.0);
    let mut velocity = forward * impulse;
    if actor_velocity.iter().all(|v| v.is_finite()) {
        velocity += actor_velocity * cfg.throw_inherit_factor;
    }
    Launch { center, velocity }
}

/// Index of the first stowed body of `kind`, reused as the projectile.
pub fn find_stowed(bodies: &[DynamicBody], kind: BodyKind) -> Option<usize> {
    bodies.iter().position(|b| b.stowed && b.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;
    use approx::assert_relative_eq;

    #[test]
    fn impulse_starts_at_base() {
        let cfg = SimConfig::default();
        assert_relative_eq!(throw_impulse(0.0, &cfg), 15.0);
        assert_relative_eq!(throw_impulse(-3.0, &cfg), 15.0);
        assert_relative_eq!(throw_impulse(f32::NAN, &cfg), 15.0);
    }

    #[test]
    fn impulse_matches_charge_curve() {
        let cfg = SimConfig::default();
        // One second held is 1000 ms in the `exp(-ms * 0.001)` form.
        let expected = 15.0 + 30.0 * (1.0 - (-1.0f32).exp());
        assert_relative_eq!(throw_impulse(1.0, &cfg), expected, epsilon = 1e-5);
    }

    #[test]
    fn impulse_is_monotone_and_bounded() {
        let cfg = SimConfig::default();
        let mut prev = throw_impulse(0.0, &cfg);
        for i in 1..=4000 {
            let t = i as f32 * 0.01;
            let impulse = throw_impulse(t, &cfg);
            assert!(impulse >= prev, "impulse decreased at t={t}");
            assert!((15.0..45.0).contains(&impulse), "impulse {impulse} out of range at t={t}");
            prev = impulse;
        }
        assert!(throw_impulse(f32::INFINITY, &cfg) < 45.0);
        assert!(throw_impulse(f32::MAX, &cfg) < 45.0);
    }

    #[test]
    fn launch_spawns_in_front_of_the_eye() {
        let cfg = SimConfig::default();
        let capsule = Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let launch = launch_from(
            &capsule,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
            20.0,
            &cfg,
        );
        assert_relative_eq!(launch.center, Vec3::new(0.0, 1.0, -0.7), epsilon = 1e-6);
        assert_relative_eq!(launch.velocity, Vec3::new(2.0, 0.0, -20.0), epsilon = 1e-5);
    }

    #[test]
    fn zero_forward_falls_back() {
        let cfg = SimConfig::default();
        let capsule = Capsule::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let launch = launch_from(&capsule, Vec3::zeros(), Vec3::zeros(), 15.0, &cfg);
        assert!(launch.velocity.iter().all(|v| v.is_finite()));
        assert_relative_eq!(launch.velocity, Vec3::new(0.0, 0.0, -15.0));
    }

    #[test]
    fn stowed_bodies_are_reused_by_kind() {
        let mut coin = DynamicBody::new(BodyId(1), BodyKind::Coin, Vec3::zeros(), 0.2);
        let mut item = DynamicBody::new(BodyId(2), BodyKind::Item, Vec3::zeros(), 0.2);
        let loose = DynamicBody::new(BodyId(3), BodyKind::Item, Vec3::zeros(), 0.2);
        coin.stow(-100.0);
        item.stow(-100.0);
        let bodies = vec![loose, coin, item];
        assert_eq!(find_stowed(&bodies, BodyKind::Item), Some(2));
        assert_eq!(find_stowed(&bodies, BodyKind::Coin), Some(1));
        assert_eq!(find_stowed(&bodies, BodyKind::Ball), None);
    }
}
