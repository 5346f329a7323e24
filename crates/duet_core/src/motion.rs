//! Directional press handling.
//!
//! A press in the direction the avatar already faces moves it one step. Any
//! other press only turns it, and movement stays locked for a short cooldown so
//! that a quick double press turns first and walks second instead of walking
//! sideways while the yaw tween is still catching up.
//!
//! The cooldown runs from the turn. Presses that arrive while it is running
//! are dropped without extending it, so holding a key down still walks once
//! the delay is over.

use std::time::Duration;

use glam::Vec3;

use crate::avatar::AvatarState;
use crate::facing::Facing;

/// What a directional press did to the avatar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressOutcome {
    Moved { from: Vec3, to: Vec3 },
    Turned { from: Facing, to: Facing },
    /// Already facing that way, but still inside the turn's cooldown.
    Blocked(Facing),
}

/// Movement lock driven by the frame clock.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionGate {
    cooldown: f32,
    remaining: f32,
}

impl MotionGate {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: cooldown.as_secs_f32(),
            remaining: 0.0,
        }
    }

    /// `true` when a press in the current facing would move the avatar.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Seconds left before movement is re-enabled.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Locks movement for one full cooldown.
    pub fn close(&mut self) {
        self.remaining = self.cooldown;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    /// Applies one press of `facing` to `state`.
    pub fn press(&mut self, state: &mut AvatarState, facing: Facing, step_length: f32) -> PressOutcome {
        if state.facing == facing {
            if !self.is_open() {
                return PressOutcome::Blocked(facing);
            }
            let from = state.position;
            state.position += facing.step() * step_length;
            return PressOutcome::Moved {
                from,
                to: state.position,
            };
        }

        let from = state.facing;
        state.facing = facing;
        state.rotation = facing.rotation();
        self.close();
        PressOutcome::Turned { from, to: facing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::AvatarKind;

    #[test]
    fn zero_cooldown_never_blocks() {
        let mut gate = MotionGate::new(Duration::ZERO);
        let mut state = AvatarState::spawn(AvatarKind::Male);

        assert!(matches!(
            gate.press(&mut state, Facing::Up, 0.3),
            PressOutcome::Turned { .. }
        ));
        assert!(gate.is_open());
        assert!(matches!(
            gate.press(&mut state, Facing::Up, 0.3),
            PressOutcome::Moved { .. }
        ));
    }
}
