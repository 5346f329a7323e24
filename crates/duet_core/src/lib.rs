//! Duet stage state.
//!
//! Everything here is independent of the rendering engine: the avatars'
//! facing and position rules, the yaw tween, the clip cross-fade schedule, the
//! control overlay model and the configuration. The rendering side in
//! `duet_app` reads this state every frame and mirrors it onto scene nodes.

pub mod avatar;
pub mod clip;
pub mod config;
pub mod crossfade;
pub mod errors;
pub mod facing;
pub mod motion;
pub mod orientation;
pub mod overlay;
pub mod stage;

pub use avatar::{AvatarKind, AvatarState, ModelSource};
pub use clip::{Clip, ClipLibrary};
pub use config::StageConfig;
pub use crossfade::{CrossFade, Layer};
pub use errors::{Result, StageError};
pub use facing::Facing;
pub use motion::{MotionGate, PressOutcome};
pub use orientation::{YawTween, shortest_delta, wrap_angle};
pub use overlay::{Command, Overlay};
pub use stage::Stage;
