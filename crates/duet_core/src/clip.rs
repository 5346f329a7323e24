//! Canned animation clips.
//!
//! Every avatar can play one of four pre-authored skeletal animations. Each
//! clip lives in its own glTF binary per avatar kind; the animation inside that
//! file is located by a case-insensitive substring match on its name, since
//! exported clip names carry rig prefixes and suffixes (`"M_Talking_Variations_004"`,
//! `"F_Dances_001|mixamo.com"`, …).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::avatar::AvatarKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clip {
    #[default]
    Idle,
    Talk,
    Fall,
    Dance,
}

impl Clip {
    pub const ALL: [Clip; 4] = [Clip::Idle, Clip::Talk, Clip::Fall, Clip::Dance];

    /// Substring that identifies this clip among the animation names of a file.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Clip::Idle => "idle",
            Clip::Talk => "talking",
            Clip::Fall => "falling",
            Clip::Dance => "dance",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Clip::Idle => "Idle",
            Clip::Talk => "Talk",
            Clip::Fall => "Fall",
            Clip::Dance => "Dance",
        }
    }

    /// Dense index in `0..4`, matching [`Clip::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Clip::Idle => 0,
            Clip::Talk => 1,
            Clip::Fall => 2,
            Clip::Dance => 3,
        }
    }

    /// Returns the first of `names` that contains [`pattern`](Self::pattern),
    /// ignoring case.
    pub fn find_in<'a, I, S>(self, names: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        let pattern = self.pattern();
        names
            .into_iter()
            .map(AsRef::as_ref)
            .find(|name| name.to_lowercase().contains(pattern))
    }

    /// File stem of the clip source for the given avatar kind.
    #[must_use]
    pub const fn file_stem(self, kind: AvatarKind) -> &'static str {
        match (kind, self) {
            (AvatarKind::Male, Clip::Idle) => "M_Standing_Idle_001",
            (AvatarKind::Male, Clip::Talk) => "M_Talking_Variations_004",
            (AvatarKind::Male, Clip::Fall) => "M_Falling_Idle_001",
            (AvatarKind::Male, Clip::Dance) => "M_Dances_001",
            (AvatarKind::Female, Clip::Idle) => "F_Standing_Idle_001",
            (AvatarKind::Female, Clip::Talk) => "F_Talking_Variations_004",
            (AvatarKind::Female, Clip::Fall) => "F_Falling_Idle_001",
            (AvatarKind::Female, Clip::Dance) => "F_Dances_001",
        }
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clip source files for one avatar kind.
///
/// Clips always come from these files, whatever visual model the avatar
/// currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipLibrary {
    kind: AvatarKind,
    files: [PathBuf; 4],
}

impl ClipLibrary {
    /// Builds the library for `kind` with every clip file under `dir`.
    pub fn new(kind: AvatarKind, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let files = Clip::ALL.map(|clip| dir.join(format!("{}.glb", clip.file_stem(kind))));
        Self { kind, files }
    }

    #[must_use]
    pub fn kind(&self) -> AvatarKind {
        self.kind
    }

    #[must_use]
    pub fn path(&self, clip: Clip) -> &Path {
        &self.files[clip.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Clip, &Path)> {
        Clip::ALL.into_iter().map(move |clip| (clip, self.path(clip)))
    }
}
