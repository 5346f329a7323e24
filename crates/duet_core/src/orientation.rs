//! Smooth yaw interpolation toward a target facing.
//!
//! Every frame the tween closes a fixed fraction (`turn_rate * dt`) of the
//! remaining yaw, always around the shorter side of the circle. Once the
//! remaining yaw drops below the snap threshold it lands exactly on the target
//! and stops.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::config::OrientationConfig;
use crate::facing::Facing;

/// Maps an angle into `[-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +π to -π; keep the sign of the input at the seam
    if wrapped == -PI && angle > 0.0 { PI } else { wrapped }
}

/// Signed yaw from `from` to `to` along the shorter arc.
#[must_use]
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

#[derive(Debug, Clone, PartialEq)]
pub struct YawTween {
    current: Vec3,
    target: Vec3,
    rotating: bool,
    turn_rate: f32,
    snap_threshold: f32,
}

impl YawTween {
    /// Starts at rest on `rotation`.
    #[must_use]
    pub fn new(rotation: Vec3, config: &OrientationConfig) -> Self {
        Self {
            current: rotation,
            target: rotation,
            rotating: false,
            turn_rate: config.turn_rate,
            snap_threshold: config.snap_threshold,
        }
    }

    #[must_use]
    pub fn current(&self) -> Vec3 {
        self.current
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn retarget(&mut self, facing: Facing) {
        self.target = facing.rotation();
        self.rotating = true;
    }

    /// Jumps straight to `rotation` without tweening.
    pub fn snap_to(&mut self, rotation: Vec3) {
        self.current = rotation;
        self.target = rotation;
        self.rotating = false;
    }

    /// Advances by `dt` seconds and returns the rotation to apply.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if !self.rotating {
            return self.current;
        }

        let diff = shortest_delta(self.current.y, self.target.y);
        if diff.abs() < self.snap_threshold {
            self.current = self.target;
            self.rotating = false;
            return self.current;
        }

        // Clamped so a long frame cannot overshoot past the target.
        let factor = (self.turn_rate * dt.max(0.0)).min(1.0);
        self.current.y = wrap_angle(self.current.y + diff * factor);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_pi_positive() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) + PI).abs() < 1e-6);
    }

    #[test]
    fn idle_tween_returns_current() {
        let mut tween = YawTween::new(Facing::Down.rotation(), &OrientationConfig::default());
        assert_eq!(tween.advance(0.016), Facing::Down.rotation());
        assert!(!tween.is_rotating());
    }
}
