//! Clip cross-fade tests
//!
//! Tests for:
//! - Fading the first clip in from silence
//! - Switching clips: weights, completion and restart
//! - Name matching against a clip file's animation list

use duet::{Clip, CrossFade};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;
const FADE: f32 = 0.3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn settled_on(clip: Clip) -> CrossFade {
    let mut fade = CrossFade::new(FADE);
    fade.play(clip);
    fade.advance(FADE + 0.1);
    fade
}

fn assert_weights_in_range(fade: &CrossFade) {
    for layer in fade.layers() {
        assert!((0.0..=1.0).contains(&layer.weight), "{:?} = {}", layer.clip, layer.weight);
    }
}

// ============================================================================
// First Clip
// ============================================================================

#[test]
fn new_schedule_is_silent() {
    let fade = CrossFade::new(FADE);
    assert_eq!(fade.current(), None);
    assert_eq!(fade.total_weight(), 0.0);
    assert_eq!(fade.audible().count(), 0);
}

#[test]
fn first_clip_fades_in() {
    let mut fade = CrossFade::new(FADE);
    fade.play(Clip::Idle);
    assert_eq!(fade.current(), Some(Clip::Idle));
    assert_eq!(fade.weight(Clip::Idle), 0.0);

    fade.advance(FADE / 2.0);
    assert!(approx_eq(fade.weight(Clip::Idle), 0.5));

    fade.advance(FADE);
    assert_eq!(fade.weight(Clip::Idle), 1.0);
    assert!(fade.is_settled());
}

// ============================================================================
// Switching
// ============================================================================

#[test]
fn switch_crossfades_over_fade_duration() {
    let mut fade = settled_on(Clip::Idle);
    fade.play(Clip::Dance);

    fade.advance(FADE / 2.0);
    assert!(approx_eq(fade.weight(Clip::Dance), 0.5));
    assert!(approx_eq(fade.weight(Clip::Idle), 0.5));
    assert!(approx_eq(fade.total_weight(), 1.0));
    assert_weights_in_range(&fade);

    fade.advance(FADE);
    assert_eq!(fade.weight(Clip::Dance), 1.0);
    assert_eq!(fade.weight(Clip::Idle), 0.0);
    assert!(fade.is_settled());
    assert_eq!(fade.audible().count(), 1);
}

#[test]
fn weights_stay_in_range_through_rapid_switches() {
    let mut fade = settled_on(Clip::Idle);
    for clip in [Clip::Talk, Clip::Fall, Clip::Dance, Clip::Idle, Clip::Talk] {
        fade.play(clip);
        for _ in 0..3 {
            fade.advance(0.04);
            assert_weights_in_range(&fade);
        }
    }
    fade.advance(FADE + 0.1);
    assert_eq!(fade.weight(Clip::Talk), 1.0);
    assert_eq!(fade.audible().count(), 1);
}

#[test]
fn switching_restarts_the_new_clip() {
    let mut fade = settled_on(Clip::Talk);
    fade.advance(2.0);
    assert!(fade.layer(Clip::Talk).time > 2.0);

    fade.play(Clip::Fall);
    fade.advance(FADE + 0.1);
    fade.play(Clip::Talk);
    assert_eq!(fade.layer(Clip::Talk).time, 0.0);
}

#[test]
fn replaying_current_clip_restarts_it() {
    let mut fade = settled_on(Clip::Dance);
    fade.advance(1.0);
    fade.play(Clip::Dance);
    assert_eq!(fade.layer(Clip::Dance).time, 0.0);
    assert_eq!(fade.current(), Some(Clip::Dance));
}

#[test]
fn switch_before_first_frame_settles() {
    let mut fade = CrossFade::new(FADE);
    fade.play(Clip::Idle);
    fade.play(Clip::Talk);
    fade.advance(FADE + 0.1);
    assert!(fade.is_settled());
    assert_eq!(fade.weight(Clip::Idle), 0.0);
    assert_eq!(fade.weight(Clip::Talk), 1.0);
}

#[test]
fn silent_clips_do_not_advance() {
    let mut fade = settled_on(Clip::Idle);
    fade.advance(1.0);
    assert_eq!(fade.layer(Clip::Dance).time, 0.0);
}

// ============================================================================
// Name Matching
// ============================================================================

#[test]
fn play_matching_finds_prefixed_names() {
    let names = ["F_Dances_001|mixamo.com", "Armature|TPose"];
    let mut fade = CrossFade::new(FADE);
    let found = fade.play_matching(Clip::Dance, &names);
    assert_eq!(found, Some("F_Dances_001|mixamo.com"));
    assert_eq!(fade.current(), Some(Clip::Dance));
}

#[test]
fn play_matching_miss_leaves_schedule_untouched() {
    let names = vec!["M_Standing_Idle_001".to_string()];
    let mut fade = settled_on(Clip::Idle);
    let before = fade.clone();

    assert_eq!(fade.play_matching(Clip::Dance, &names), None);
    assert_eq!(fade, before);
}
