//! Fundamental geometric and simulation-time types.
//!
//! The arena is a flat XZ plane with Y up. Facing directions are kept
//! horizontal and normalized.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Elapsed time for one frame, in both time bases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Scaled simulation time (affected by the tactical-pause time scale).
    pub delta: f32,
    /// Unscaled real time.
    pub unscaled_delta: f32,
}

impl FrameTime {
    /// Build a frame from a real-time delta and the current time scale.
    pub fn new(unscaled_delta: f32, time_scale: f32) -> Self {
        Self {
            delta: unscaled_delta * time_scale,
            unscaled_delta,
        }
    }

    /// A frame where simulation time runs at normal speed.
    pub fn unscaled(delta: f32) -> Self {
        Self::new(delta, 1.0)
    }
}

/// Simulation clock tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Frame counter (increments by 1 each tick).
    pub frame: u64,
    /// Elapsed scaled simulation time in seconds.
    pub elapsed_secs: f32,
    /// Elapsed real time in seconds.
    pub unscaled_elapsed_secs: f32,
}

impl SimClock {
    /// Advance by one frame.
    pub fn advance(&mut self, time: FrameTime) {
        self.frame += 1;
        self.elapsed_secs += time.delta;
        self.unscaled_elapsed_secs += time.unscaled_delta;
    }
}

/// Horizontal unit direction from `from` toward `to`, or `None` when the
/// points coincide on the ground plane.
pub fn flat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = to - from;
    Vec3::new(delta.x, 0.0, delta.z).try_normalize()
}

/// Rotate `current` toward `target` by at most `max_radians`.
///
/// Both inputs are expected to be unit vectors. Returns `target` once the
/// remaining angle fits inside the step.
pub fn rotate_towards(current: Vec3, target: Vec3, max_radians: f32) -> Vec3 {
    let angle = current.angle_between(target);
    if !angle.is_finite() || angle <= max_radians {
        return target;
    }
    let (axis, _) = Quat::from_rotation_arc(current, target).to_axis_angle();
    (Quat::from_axis_angle(axis, max_radians) * current).normalize_or_zero()
}

/// Spherically interpolate a unit direction toward `target` by factor `t`.
pub fn slerp_direction(current: Vec3, target: Vec3, t: f32) -> Vec3 {
    let arc = Quat::from_rotation_arc(current, target);
    (Quat::IDENTITY.slerp(arc, t.clamp(0.0, 1.0)) * current).normalize_or_zero()
}

/// Linear interpolation between two scalars, `t` clamped to `[0, 1]`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
