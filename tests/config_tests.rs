//! Configuration tests
//!
//! Tests for:
//! - Built-in defaults
//! - Partial JSON documents and file loading
//! - Validation of out-of-range values

use std::time::Duration;

use duet::glam::Vec3;
use duet::{AvatarKind, Clip, StageConfig, StageError};

// ============================================================================
// Helper
// ============================================================================

fn invalid_field(config: &StageConfig) -> Option<&'static str> {
    match config.validate() {
        Err(StageError::InvalidConfig { field, .. }) => Some(field),
        _ => None,
    }
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn defaults_match_stage_tuning() {
    let config = StageConfig::default();
    assert_eq!(config.motion.step_length, 0.3);
    assert_eq!(config.motion.reorient_cooldown(), Duration::from_millis(300));
    assert_eq!(config.animation.fade_seconds, 0.3);
    assert_eq!(config.avatars.scale, 0.8);
    assert_eq!(config.ground.radius, 1.3);
    assert_eq!(config.ground.segments, 64);
    assert_eq!(config.ground.center, Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(config.camera.position, Vec3::new(0.0, 1.5, 3.0));
    assert_eq!(config.camera.fov, 60.0);
    assert!(config.camera.enable_rotate);
    assert!(!config.camera.enable_zoom);
    assert!(!config.camera.enable_pan);
    assert!(config.validate().is_ok());
}

#[test]
fn clip_library_uses_clip_dir() {
    let config = StageConfig::default();
    let library = config.avatars.clip_library(AvatarKind::Female);
    assert_eq!(library.kind(), AvatarKind::Female);
    assert!(library.path(Clip::Dance).starts_with(&config.avatars.clip_dir));
    assert!(library.path(Clip::Dance).ends_with("F_Dances_001.glb"));
    assert_eq!(library.iter().count(), 4);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn empty_document_is_default() -> anyhow::Result<()> {
    assert_eq!(StageConfig::from_json("{}")?, StageConfig::default());
    Ok(())
}

#[test]
fn partial_document_keeps_other_defaults() -> anyhow::Result<()> {
    let config = StageConfig::from_json(
        r#"{
            "motion": { "step_length": 0.5 },
            "camera": { "position": [0.0, 2.0, 4.0], "enable_zoom": true },
            "window": { "title": "Rehearsal" }
        }"#,
    )?;

    assert_eq!(config.motion.step_length, 0.5);
    assert_eq!(config.motion.reorient_cooldown_ms, 300);
    assert_eq!(config.camera.position, Vec3::new(0.0, 2.0, 4.0));
    assert!(config.camera.enable_zoom);
    assert!(config.camera.enable_rotate);
    assert_eq!(config.window.title, "Rehearsal");
    assert!(config.window.vsync);
    Ok(())
}

#[test]
fn malformed_document_is_a_parse_error() {
    let result = StageConfig::from_json("{ \"motion\": ");
    assert!(matches!(result, Err(StageError::ConfigParse(_))));
}

#[test]
fn serialized_config_loads_back() -> anyhow::Result<()> {
    let mut config = StageConfig::default();
    config.animation.fade_seconds = 0.5;
    config.avatars.scale = 1.0;

    let json = serde_json::to_string(&config)?;
    assert_eq!(StageConfig::from_json(&json)?, config);
    Ok(())
}

#[test]
fn missing_file_is_a_read_error() {
    let result = StageConfig::from_file("does/not/exist/duet.json");
    assert!(matches!(result, Err(StageError::ConfigRead { .. })));
}

#[test]
fn unreadable_path_names_the_file() {
    let dir = std::env::temp_dir();
    let err = StageConfig::from_file(&dir).unwrap_err();
    match err {
        StageError::ConfigRead { path, .. } => assert_eq!(path, dir.display().to_string()),
        other => panic!("expected ConfigRead, got {other:?}"),
    }
}

#[test]
fn config_file_is_read_from_disk() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("duet-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "ground": { "segments": 32 } }"#)?;

    let config = StageConfig::from_file(&path);
    std::fs::remove_file(&path)?;

    assert_eq!(config?.ground.segments, 32);
    Ok(())
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn validate_rejects_non_positive_values() {
    let mut config = StageConfig::default();
    config.motion.step_length = 0.0;
    assert_eq!(invalid_field(&config), Some("motion.step_length"));

    let mut config = StageConfig::default();
    config.animation.fade_seconds = -1.0;
    assert_eq!(invalid_field(&config), Some("animation.fade_seconds"));

    let mut config = StageConfig::default();
    config.avatars.scale = f32::NAN;
    assert_eq!(invalid_field(&config), Some("avatars.scale"));
}

#[test]
fn validate_rejects_degenerate_disc() {
    let mut config = StageConfig::default();
    config.ground.segments = 2;
    assert_eq!(invalid_field(&config), Some("ground.segments"));
}

#[test]
fn validate_rejects_bad_camera() {
    let mut config = StageConfig::default();
    config.camera.fov = 180.0;
    assert_eq!(invalid_field(&config), Some("camera.fov"));

    let mut config = StageConfig::default();
    config.camera.target = config.camera.position;
    assert_eq!(invalid_field(&config), Some("camera.position"));
}
