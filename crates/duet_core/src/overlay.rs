//! Floating control overlay, independent of the widget toolkit.
//!
//! The overlay is a small state machine: a floating button toggles a menu
//! with one button per avatar, choosing an avatar opens its control panel,
//! and every widget in the panel turns into a [`Command`] for the stage. The
//! renderer only draws what [`Overlay`] exposes and forwards clicks.

use crate::avatar::AvatarKind;
use crate::clip::Clip;
use crate::errors::{Result, StageError};
use crate::facing::Facing;

/// A user intent, produced by the overlay or a keyboard shortcut.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(AvatarKind, Facing),
    Reset(AvatarKind),
    SetClip(AvatarKind, Clip),
    LoadModel(AvatarKind, String),
}

impl Command {
    #[must_use]
    pub fn avatar(&self) -> AvatarKind {
        match self {
            Command::Move(kind, _)
            | Command::Reset(kind)
            | Command::SetClip(kind, _)
            | Command::LoadModel(kind, _) => *kind,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overlay {
    menu_open: bool,
    active: Option<AvatarKind>,
    /// Contents of the "Load Model" text field.
    pub url_draft: String,
    loaded_urls: [Option<String>; 2],
    alert: Option<String>,
}

impl Overlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Opens the control panel of `kind`.
    pub fn open_panel(&mut self, kind: AvatarKind) {
        self.active = Some(kind);
    }

    /// Closes the panel; the draft URL is kept for the next time it opens.
    pub fn close_panel(&mut self) {
        self.active = None;
    }

    /// Avatar whose panel is open.
    #[must_use]
    pub fn active(&self) -> Option<AvatarKind> {
        self.active
    }

    #[must_use]
    pub fn press_direction(&self, facing: Facing) -> Option<Command> {
        self.active.map(|kind| Command::Move(kind, facing))
    }

    #[must_use]
    pub fn press_reset(&self) -> Option<Command> {
        self.active.map(Command::Reset)
    }

    #[must_use]
    pub fn choose_clip(&self, clip: Clip) -> Option<Command> {
        self.active.map(|kind| Command::SetClip(kind, clip))
    }

    /// Submits the draft URL for the active avatar.
    ///
    /// Returns `Ok(None)` when there is nothing to submit. A URL the other
    /// avatar already shows is refused and raises an alert.
    pub fn submit_model(&mut self) -> Result<Option<Command>> {
        let Some(kind) = self.active else {
            return Ok(None);
        };
        let url = self.url_draft.trim();
        if url.is_empty() {
            return Ok(None);
        }

        let other = kind.other();
        if self.loaded_urls[other.index()].as_deref() == Some(url) {
            let err = StageError::ModelInUse(other);
            self.alert = Some("This model is already in use by the other avatar".to_string());
            log::warn!("{err}");
            return Err(err);
        }

        let url = url.to_string();
        self.loaded_urls[kind.index()] = Some(url.clone());
        self.url_draft.clear();
        self.active = None;
        Ok(Some(Command::LoadModel(kind, url)))
    }

    /// Forgets a URL the stage refused and tells the user why.
    pub fn record_failure(&mut self, kind: AvatarKind, error: &StageError) {
        self.loaded_urls[kind.index()] = None;
        self.alert = Some(error.to_string());
    }

    #[must_use]
    pub fn loaded_url(&self, kind: AvatarKind) -> Option<&str> {
        self.loaded_urls[kind.index()].as_deref()
    }

    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
