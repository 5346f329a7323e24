//! Myth-engine rendering of the Duet stage.
//!
//! [`StageApp`] is the engine's `AppHandler`: it owns the [`duet_core::Stage`]
//! and mirrors it every frame onto the scene through one [`AvatarRig`] per
//! avatar. Input arrives from the egui overlay ([`OverlayPass`]) and the
//! keyboard ([`keyboard`]); the mouse drives the engine's orbit controls,
//! configured by [`scene::orbit_controls`].

pub mod app;
pub mod keyboard;
pub mod loader;
pub mod overlay_pass;
pub mod rig;
pub mod scene;

pub use app::{StageApp, run};
pub use keyboard::{KeyAction, KeyboardShortcuts};
pub use overlay_pass::OverlayPass;
pub use rig::{AvatarRig, PoseBlend, RigDriver};
