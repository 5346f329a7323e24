use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One of the four compass-style orientations an avatar can be set to.
///
/// `Up` points away from the default camera (towards −Z), `Down` towards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Left, Facing::Right, Facing::Down];

    /// Fixed yaw angle (rotation about +Y) for this facing.
    #[must_use]
    pub const fn yaw(self) -> f32 {
        match self {
            Facing::Left => -FRAC_PI_2,
            Facing::Right => FRAC_PI_2,
            Facing::Up => PI,
            Facing::Down => 0.0,
        }
    }

    /// Euler rotation `(0, yaw, 0)`.
    #[must_use]
    pub const fn rotation(self) -> Vec3 {
        Vec3::new(0.0, self.yaw(), 0.0)
    }

    /// Unit ground-plane offset of one step in this direction.
    #[must_use]
    pub const fn step(self) -> Vec3 {
        match self {
            Facing::Left => Vec3::NEG_X,
            Facing::Right => Vec3::X,
            Facing::Up => Vec3::NEG_Z,
            Facing::Down => Vec3::Z,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFacing(pub String);

impl fmt::Display for UnknownFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown facing '{}'", self.0)
    }
}

impl std::error::Error for UnknownFacing {}

impl FromStr for Facing {
    type Err = UnknownFacing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Facing::Left),
            "right" => Ok(Facing::Right),
            "up" => Ok(Facing::Up),
            "down" => Ok(Facing::Down),
            _ => Err(UnknownFacing(s.to_string())),
        }
    }
}
