//! # Duet
//!
//! Two animated 3D avatars on a shared stage, steered from on-screen controls.
//!
//! The workspace is split along the engine boundary:
//!
//! - [`duet_core`] holds every rule of the stage (facing, motion, yaw
//!   tweening, clip cross-fades, the control overlay model, configuration)
//!   with no rendering dependency. Its items are re-exported at the crate root.
//! - `duet_app` (feature `viewer`, on by default) renders the stage with the
//!   Myth engine and is re-exported as [`app`].
//!
//! ```rust,ignore
//! use duet::{AvatarKind, Facing, Stage, StageConfig};
//!
//! let mut stage = Stage::new(&StageConfig::default());
//! stage.press(AvatarKind::Male, Facing::Up);
//! ```

pub use duet_core::*;

pub use glam;

#[cfg(feature = "viewer")]
pub use duet_app as app;
