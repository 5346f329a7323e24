//! Stage configuration.
//!
//! All tunables live in [`StageConfig`], a JSON document whose every field is
//! optional. Missing fields take the values the stage was designed around
//! (0.3 step, 300 ms reorient cooldown, 0.3 s cross-fade, …).
//!
//! Lookup order for [`StageConfig::load`]:
//! 1. the file named by the `DUET_CONFIG` environment variable
//! 2. `duet.json` in the working directory
//! 3. built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarKind;
use crate::clip::ClipLibrary;
use crate::errors::{Result, StageError};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DUET_CONFIG";
/// File picked up from the working directory when no variable is set.
pub const DEFAULT_CONFIG_FILE: &str = "duet.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub motion: MotionConfig,
    pub orientation: OrientationConfig,
    pub animation: AnimationConfig,
    pub avatars: AvatarsConfig,
    pub camera: CameraConfig,
    pub ground: GroundConfig,
    pub lighting: LightingConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Distance covered by one directional press.
    pub step_length: f32,
    /// How long movement stays disabled after a reorienting press.
    pub reorient_cooldown_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_length: 0.3,
            reorient_cooldown_ms: 300,
        }
    }
}

impl MotionConfig {
    #[must_use]
    pub fn reorient_cooldown(&self) -> Duration {
        Duration::from_millis(self.reorient_cooldown_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Fraction of the remaining yaw closed per second.
    pub turn_rate: f32,
    /// Remaining yaw (radians) below which the tween snaps to its target.
    pub snap_threshold: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            turn_rate: 5.0,
            snap_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub fade_seconds: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { fade_seconds: 0.3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarsConfig {
    /// Uniform scale applied to every avatar model.
    pub scale: f32,
    pub male_model: PathBuf,
    pub female_model: PathBuf,
    /// Directory holding the `M_*.glb` / `F_*.glb` clip files.
    pub clip_dir: PathBuf,
}

impl Default for AvatarsConfig {
    fn default() -> Self {
        Self {
            scale: 0.8,
            male_model: PathBuf::from("assets/3d/avatar-male.glb"),
            female_model: PathBuf::from("assets/3d/avatar-female.glb"),
            clip_dir: PathBuf::from("assets/3d"),
        }
    }
}

impl AvatarsConfig {
    #[must_use]
    pub fn default_model(&self, kind: AvatarKind) -> &Path {
        match kind {
            AvatarKind::Male => &self.male_model,
            AvatarKind::Female => &self.female_model,
        }
    }

    #[must_use]
    pub fn clip_library(&self, kind: AvatarKind) -> ClipLibrary {
        ClipLibrary::new(kind, &self.clip_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 3.0),
            target: Vec3::ZERO,
            fov: 60.0,
            near: 0.1,
            enable_rotate: true,
            enable_zoom: false,
            enable_pan: false,
            rotate_speed: 1.0,
            zoom_speed: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub center: Vec3,
    pub radius: f32,
    pub segments: u32,
    pub roughness: f32,
    pub metalness: f32,
    pub diffuse_map: PathBuf,
    pub normal_map: PathBuf,
    pub ao_map: PathBuf,
    pub roughness_map: PathBuf,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, -1.0, 0.0),
            radius: 1.3,
            segments: 64,
            roughness: 0.6,
            metalness: 0.8,
            diffuse_map: PathBuf::from("assets/textures/metal-diffuse.jpg"),
            normal_map: PathBuf::from("assets/textures/metal-normal-gl.jpg"),
            ao_map: PathBuf::from("assets/textures/metal-ao.jpg"),
            roughness_map: PathBuf::from("assets/textures/metal-rough.jpg"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub sun_position: Vec3,
    pub sun_intensity: f32,
    pub cast_shadows: bool,
    pub shadow_map_size: u32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 1.5,
            sun_position: Vec3::new(10.0, 10.0, 5.0),
            sun_intensity: 2.0,
            cast_shadows: true,
            shadow_map_size: 2048,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Linear RGBA clear colour.
    pub background: [f64; 4],
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Duet".to_string(),
            // CSS "pink" (255, 192, 203)
            background: [1.0, 0.753, 0.796, 1.0],
            vsync: true,
        }
    }
}

impl StageConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StageError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Resolves the config from the environment, the working directory or defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            log::info!("Loading config from {path} (set by {})", CONFIG_ENV);
            return Self::from_file(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("Loading config from {}", local.display());
            return Self::from_file(local);
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Rejects values the stage cannot run with.
    pub fn validate(&self) -> Result<()> {
        positive("motion.step_length", self.motion.step_length)?;
        positive("orientation.turn_rate", self.orientation.turn_rate)?;
        positive("orientation.snap_threshold", self.orientation.snap_threshold)?;
        positive("animation.fade_seconds", self.animation.fade_seconds)?;
        positive("avatars.scale", self.avatars.scale)?;
        positive("ground.radius", self.ground.radius)?;

        if self.ground.segments < 3 {
            return Err(StageError::InvalidConfig {
                field: "ground.segments",
                message: format!("a disc needs at least 3 segments, got {}", self.ground.segments),
            });
        }

        if !(1.0..180.0).contains(&self.camera.fov) {
            return Err(StageError::InvalidConfig {
                field: "camera.fov",
                message: format!("must be within [1, 180) degrees, got {}", self.camera.fov),
            });
        }

        if self.camera.position.distance(self.camera.target) <= f32::EPSILON {
            return Err(StageError::InvalidConfig {
                field: "camera.position",
                message: "camera cannot sit on its own target".to_string(),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(StageError::InvalidConfig {
            field,
            message: format!("must be a positive number, got {value}"),
        })
    }
}
