//! Facing and avatar spawn tests
//!
//! Tests for:
//! - Fixed yaw per facing and the derived Euler rotation
//! - Ground-plane step vectors
//! - Parsing facings from text
//! - Spawn records of both avatars

use std::f32::consts::{FRAC_PI_2, PI};

use duet::glam::Vec3;
use duet::{AvatarKind, AvatarState, Clip, Facing};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// ============================================================================
// Yaw & Rotation
// ============================================================================

#[test]
fn facing_yaw_values() {
    assert!(approx_eq(Facing::Left.yaw(), -FRAC_PI_2));
    assert!(approx_eq(Facing::Right.yaw(), FRAC_PI_2));
    assert!(approx_eq(Facing::Up.yaw(), PI));
    assert!(approx_eq(Facing::Down.yaw(), 0.0));
}

#[test]
fn facing_rotation_only_sets_yaw() {
    for facing in Facing::ALL {
        let r = facing.rotation();
        assert_eq!(r.x, 0.0);
        assert_eq!(r.z, 0.0);
        assert!(approx_eq(r.y, facing.yaw()));
    }
}

// ============================================================================
// Steps
// ============================================================================

#[test]
fn facing_steps_stay_on_ground_plane() {
    assert_eq!(Facing::Left.step(), Vec3::NEG_X);
    assert_eq!(Facing::Right.step(), Vec3::X);
    assert_eq!(Facing::Up.step(), Vec3::NEG_Z);
    assert_eq!(Facing::Down.step(), Vec3::Z);

    for facing in Facing::ALL {
        assert_eq!(facing.step().y, 0.0);
        assert!(approx_eq(facing.step().length(), 1.0));
    }
}

#[test]
fn opposite_facings_cancel_out() {
    assert_eq!(Facing::Left.step() + Facing::Right.step(), Vec3::ZERO);
    assert_eq!(Facing::Up.step() + Facing::Down.step(), Vec3::ZERO);
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn facing_parses_case_insensitively() {
    assert_eq!("left".parse::<Facing>(), Ok(Facing::Left));
    assert_eq!(" RIGHT ".parse::<Facing>(), Ok(Facing::Right));
    assert_eq!("Up".parse::<Facing>(), Ok(Facing::Up));
    assert_eq!("down".parse::<Facing>(), Ok(Facing::Down));
}

#[test]
fn facing_parse_rejects_unknown() {
    let err = "north".parse::<Facing>().unwrap_err();
    assert_eq!(err.0, "north");
    assert!(err.to_string().contains("north"));
}

#[test]
fn facing_display_round_trips() {
    for facing in Facing::ALL {
        assert_eq!(facing.to_string().parse::<Facing>(), Ok(facing));
    }
}

// ============================================================================
// Spawn
// ============================================================================

#[test]
fn male_spawns_left_of_center_facing_right() {
    let state = AvatarState::spawn(AvatarKind::Male);
    assert!(vec3_approx(state.position, Vec3::new(-0.5, -1.0, 0.0)));
    assert_eq!(state.facing, Facing::Right);
    assert!(vec3_approx(state.rotation, Facing::Right.rotation()));
    assert_eq!(state.clip, Clip::Idle);
    assert!(state.model.is_none());
    assert_eq!(state.model_revision, 0);
}

#[test]
fn female_spawns_right_of_center_facing_left() {
    let state = AvatarState::spawn(AvatarKind::Female);
    assert!(vec3_approx(state.position, Vec3::new(0.5, -1.0, 0.0)));
    assert_eq!(state.facing, Facing::Left);
    assert!(vec3_approx(state.rotation, Facing::Left.rotation()));
}

#[test]
fn avatars_face_each_other_at_spawn() {
    let male = AvatarState::spawn(AvatarKind::Male);
    let female = AvatarState::spawn(AvatarKind::Female);
    let towards_female = (female.position - male.position).normalize();
    assert!(vec3_approx(male.facing.step(), towards_female));
    assert!(vec3_approx(female.facing.step(), -towards_female));
}
