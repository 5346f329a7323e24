//! The stage: owner of both avatar records.
//!
//! All user intents funnel through [`Stage`]. It holds no rendering state; the
//! rendering side reads [`Stage::avatar`] every frame and reacts to changes of
//! facing, clip and model revision.

use std::path::PathBuf;

use crate::avatar::{AvatarKind, AvatarState, ModelSource};
use crate::clip::Clip;
use crate::config::StageConfig;
use crate::errors::Result;
use crate::facing::Facing;
use crate::motion::{MotionGate, PressOutcome};
use crate::overlay::Command;

/// Facing applied by [`Stage::reset`].
pub const RESET_FACING: Facing = Facing::Up;

#[derive(Debug, Clone)]
pub struct Stage {
    avatars: [AvatarState; 2],
    gates: [MotionGate; 2],
    default_models: [PathBuf; 2],
    step_length: f32,
}

impl Stage {
    #[must_use]
    pub fn new(config: &StageConfig) -> Self {
        let cooldown = config.motion.reorient_cooldown();
        Self {
            avatars: AvatarKind::ALL.map(AvatarState::spawn),
            gates: [MotionGate::new(cooldown), MotionGate::new(cooldown)],
            default_models: AvatarKind::ALL
                .map(|kind| config.avatars.default_model(kind).to_path_buf()),
            step_length: config.motion.step_length,
        }
    }

    #[must_use]
    pub fn avatar(&self, kind: AvatarKind) -> &AvatarState {
        &self.avatars[kind.index()]
    }

    #[must_use]
    pub fn gate(&self, kind: AvatarKind) -> &MotionGate {
        &self.gates[kind.index()]
    }

    /// Model the avatar should currently show: the override if any, else the
    /// bundled default.
    #[must_use]
    pub fn model_source(&self, kind: AvatarKind) -> ModelSource {
        self.avatar(kind)
            .model
            .clone()
            .unwrap_or_else(|| ModelSource::Bundled(self.default_models[kind.index()].clone()))
    }

    /// Handles a directional press: walk if already facing that way and the
    /// gate is open, turn and lock movement if facing elsewhere, and do
    /// nothing while a turn's cooldown is still running.
    pub fn press(&mut self, kind: AvatarKind, facing: Facing) -> PressOutcome {
        let i = kind.index();
        let outcome = self.gates[i].press(&mut self.avatars[i], facing, self.step_length);
        match outcome {
            PressOutcome::Moved { to, .. } => log::debug!("{kind} moved to {to}"),
            PressOutcome::Turned { from, to } => log::debug!("{kind} turned {from} -> {to}"),
            PressOutcome::Blocked(facing) => log::debug!("{kind} still turning {facing}"),
        }
        outcome
    }

    /// Puts the avatar back on its spawn point facing away from the camera.
    /// The clip and model override are kept.
    pub fn reset(&mut self, kind: AvatarKind) {
        let avatar = &mut self.avatars[kind.index()];
        avatar.position = kind.spawn_position();
        avatar.facing = RESET_FACING;
        avatar.rotation = RESET_FACING.rotation();
        log::debug!("{kind} reset");
    }

    pub fn set_clip(&mut self, kind: AvatarKind, clip: Clip) {
        let avatar = &mut self.avatars[kind.index()];
        if avatar.clip != clip {
            log::debug!("{kind} clip {} -> {clip}", avatar.clip);
        }
        avatar.clip = clip;
    }

    /// Replaces the avatar's visual model. Clip sources are unaffected.
    pub fn load_model(&mut self, kind: AvatarKind, input: &str) -> Result<&ModelSource> {
        let source = ModelSource::parse(input).inspect_err(|err| {
            log::error!("Invalid model path provided {input:?}: {err}");
        })?;
        log::info!("{kind} model -> {source}");

        let avatar = &mut self.avatars[kind.index()];
        avatar.model_revision = avatar.model_revision.wrapping_add(1);
        Ok(avatar.model.insert(source))
    }

    /// Applies an overlay or keyboard command.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Move(kind, facing) => {
                self.press(*kind, *facing);
            }
            Command::Reset(kind) => self.reset(*kind),
            Command::SetClip(kind, clip) => self.set_clip(*kind, *clip),
            Command::LoadModel(kind, url) => {
                self.load_model(*kind, url)?;
            }
        }
        Ok(())
    }

    /// Advances the movement cooldowns.
    pub fn tick(&mut self, dt: f32) {
        for gate in &mut self.gates {
            gate.tick(dt);
        }
    }
}
