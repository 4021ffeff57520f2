//! Mob spawn cadence.
//!
//! Spawn points are visited round-robin so runs are reproducible. Mobs are
//! dropped a few meters above the point and fall onto the level.

use crate::collision::Vec3;
use crate::config::SimConfig;

/// Spawn points of the demo arena (x, y, z).
pub const DEFAULT_SPAWN_POINTS: [[f32; 3]; 4] = [
    [15.0, 5.0, 15.0],
    [5.0, 5.0, 15.0],
    [15.0, 5.0, 5.0],
    [-12.0, 5.0, -12.0],
];

#[derive(Clone, Debug)]
pub struct MobSpawner {
    /// Seconds between spawns; zero disables the spawner.
    pub interval_secs: f32,
    pub max_alive: u32,
    pub spawn_points: Vec<Vec3>,
    timer: f32,
    cursor: usize,
}

impl MobSpawner {
    pub fn new(cfg: &SimConfig, spawn_points: Vec<Vec3>) -> Self {
        Self {
            interval_secs: cfg.mob_spawn_interval,
            max_alive: cfg.mob_max_alive,
            spawn_points,
            timer: 0.0,
            cursor: 0,
        }
    }

    pub fn with_default_points(cfg: &SimConfig) -> Self {
        Self::new(cfg, DEFAULT_SPAWN_POINTS.iter().map(|p| Vec3::from(*p)).collect())
    }

    /// Advance by `dt`. Returns where to spawn a mob, if one is due.
    ///
    /// The timer keeps running while the arena is full, so a mob appears as
    /// soon as a slot frees up after the interval has passed.
    pub fn tick(&mut self, dt: f32, alive: usize) -> Option<Vec3> {
        if self.interval_secs <= 0.0 || self.spawn_points.is_empty() {
            return None;
        }
        self.timer += dt.max(0.0);
        if self.timer < self.interval_secs || alive >= self.max_alive as usize {
            return None;
        }
        self.timer = 0.0;
        let point = self.spawn_points[self.cursor % self.spawn_points.len()];
        self.cursor = (self.cursor + 1) % self.spawn_points.len();
        Some(point)
    }
}
