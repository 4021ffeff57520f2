//! Player input and view orientation.
//!
//! The host samples its keyboard and mouse once per frame into an
//! [`InputState`]; the simulation only ever reads it. Keys are plain
//! held-booleans, the mouse is a pixel delta accumulated since the last frame.

use serde::{Deserialize, Serialize};

use crate::collision::Vec3;

/// Logical keys the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    /// Held to charge a throw, released to throw.
    Throw,
}

/// Raw input for a single frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub throw: bool,

    /// Mouse delta this frame (pixels).
    pub mouse_delta: (f32, f32),
}

impl InputState {
    pub fn set(&mut self, key: Key, held: bool) {
        *self.slot(key) = held;
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Forward => self.forward,
            Key::Backward => self.backward,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Jump => self.jump,
            Key::Throw => self.throw,
        }
    }

    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Forward => &mut self.forward,
            Key::Backward => &mut self.backward,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Jump => &mut self.jump,
            Key::Throw => &mut self.throw,
        }
    }

    /// Forward/backward axis in {-1, 0, 1}.
    #[inline]
    pub fn forward_axis(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// Right/left axis in {-1, 0, 1}.
    #[inline]
    pub fn side_axis(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

/// Camera orientation of the player.
///
/// Yaw 0 looks down -Z; positive yaw turns left. Pitch is clamped just short
/// of straight up/down so the horizontal forward never degenerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewAngles {
    pub yaw: f32,
    pub pitch: f32,
}

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl ViewAngles {
    /// Apply a mouse delta: moving right turns right, moving down looks down.
    pub fn apply_mouse(&mut self, delta: (f32, f32), pixels_per_radian: f32) {
        let (dx, dy) = delta;
        if !(dx.is_finite() && dy.is_finite()) || pixels_per_radian <= 0.0 {
            return;
        }
        self.yaw -= dx / pixels_per_radian;
        self.pitch = (self.pitch - dy / pixels_per_radian).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Unit look direction including pitch.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Unit look direction flattened onto the XZ plane.
    pub fn horizontal_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    /// Unit strafe-right direction on the XZ plane.
    pub fn side(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }
}
