use std::fmt;
use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::clip::Clip;
use crate::errors::{Result, StageError};
use crate::facing::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarKind {
    Male,
    Female,
}

impl AvatarKind {
    pub const ALL: [AvatarKind; 2] = [AvatarKind::Male, AvatarKind::Female];

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            AvatarKind::Male => AvatarKind::Female,
            AvatarKind::Female => AvatarKind::Male,
        }
    }

    /// Panel heading, e.g. `"Male Avatar"`.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            AvatarKind::Male => "Male Avatar",
            AvatarKind::Female => "Female Avatar",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AvatarKind::Male => "male",
            AvatarKind::Female => "female",
        }
    }

    /// Where the avatar stands when the stage opens or is reset.
    #[must_use]
    pub const fn spawn_position(self) -> Vec3 {
        match self {
            AvatarKind::Male => Vec3::new(-0.5, -1.0, 0.0),
            AvatarKind::Female => Vec3::new(0.5, -1.0, 0.0),
        }
    }

    /// The two avatars start out facing each other.
    #[must_use]
    pub const fn spawn_facing(self) -> Facing {
        match self {
            AvatarKind::Male => Facing::Right,
            AvatarKind::Female => Facing::Left,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AvatarKind::Male => 0,
            AvatarKind::Female => 1,
        }
    }
}

impl fmt::Display for AvatarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an avatar's visual model comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelSource {
    /// One of the models shipped with the application.
    Bundled(PathBuf),
    /// A user-provided local file.
    File(PathBuf),
    /// A user-provided `http`/`https` URL.
    Remote(Url),
}

impl ModelSource {
    /// Interprets user input from the "Load Model" field.
    ///
    /// Inputs starting with `http://` or `https://` must be valid URLs; anything
    /// else is treated as a local file path.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(StageError::EmptyModelPath);
        }

        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(input).map_err(|source| StageError::InvalidModelUrl {
                input: input.to_string(),
                source,
            })?;
            return Ok(ModelSource::Remote(url));
        }

        Ok(ModelSource::File(PathBuf::from(input)))
    }

    /// The path or URL handed to the asset loader.
    #[must_use]
    pub fn uri(&self) -> String {
        match self {
            ModelSource::Bundled(path) | ModelSource::File(path) => {
                path.to_string_lossy().into_owned()
            }
            ModelSource::Remote(url) => url.as_str().to_string(),
        }
    }

    /// Short name for titles and log lines.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            ModelSource::Bundled(path) | ModelSource::File(path) => path
                .file_name()
                .map_or_else(|| self.uri(), |n| n.to_string_lossy().into_owned()),
            ModelSource::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .map_or_else(|| url.as_str().to_string(), ToString::to_string),
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Per-avatar UI state: where it stands, where it looks, what it plays and
/// which model it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarState {
    pub position: Vec3,
    /// Target Euler angles for `facing`; only `y` (yaw) is ever non-zero.
    pub rotation: Vec3,
    pub facing: Facing,
    pub clip: Clip,
    /// Overrides the bundled model when set.
    pub model: Option<ModelSource>,
    /// Bumped whenever `model` changes so the rendering side knows to rebuild.
    pub model_revision: u32,
}

impl AvatarState {
    #[must_use]
    pub fn spawn(kind: AvatarKind) -> Self {
        let facing = kind.spawn_facing();
        Self {
            position: kind.spawn_position(),
            rotation: facing.rotation(),
            facing,
            clip: Clip::Idle,
            model: None,
            model_revision: 0,
        }
    }
}
