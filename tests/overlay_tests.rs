//! Control overlay tests
//!
//! Tests for:
//! - Menu and panel state
//! - Commands produced by panel widgets
//! - Model submission: trimming, duplicate rejection, failure rollback

use duet::{AvatarKind, Clip, Command, Facing, Overlay, StageError};

// ============================================================================
// Helper
// ============================================================================

fn overlay_with_panel(kind: AvatarKind) -> Overlay {
    let mut overlay = Overlay::new();
    overlay.toggle_menu();
    overlay.open_panel(kind);
    overlay
}

fn submit(overlay: &mut Overlay, kind: AvatarKind, url: &str) -> duet::Result<Option<Command>> {
    overlay.open_panel(kind);
    overlay.url_draft = url.to_string();
    overlay.submit_model()
}

// ============================================================================
// Menu & Panel
// ============================================================================

#[test]
fn overlay_starts_closed() {
    let overlay = Overlay::new();
    assert!(!overlay.is_menu_open());
    assert_eq!(overlay.active(), None);
    assert_eq!(overlay.alert(), None);
}

#[test]
fn menu_toggles() {
    let mut overlay = Overlay::new();
    overlay.toggle_menu();
    assert!(overlay.is_menu_open());
    overlay.toggle_menu();
    assert!(!overlay.is_menu_open());
}

#[test]
fn panel_opens_for_chosen_avatar() {
    let mut overlay = overlay_with_panel(AvatarKind::Female);
    assert_eq!(overlay.active(), Some(AvatarKind::Female));
    overlay.close_panel();
    assert_eq!(overlay.active(), None);
}

// ============================================================================
// Widget Commands
// ============================================================================

#[test]
fn widgets_without_panel_produce_nothing() {
    let mut overlay = Overlay::new();
    assert_eq!(overlay.press_direction(Facing::Up), None);
    assert_eq!(overlay.press_reset(), None);
    assert_eq!(overlay.choose_clip(Clip::Dance), None);

    overlay.url_draft = "https://example.com/a.glb".to_string();
    assert!(matches!(overlay.submit_model(), Ok(None)));
}

#[test]
fn widgets_target_active_avatar() {
    let overlay = overlay_with_panel(AvatarKind::Male);
    assert_eq!(
        overlay.press_direction(Facing::Left),
        Some(Command::Move(AvatarKind::Male, Facing::Left))
    );
    assert_eq!(overlay.press_reset(), Some(Command::Reset(AvatarKind::Male)));
    assert_eq!(
        overlay.choose_clip(Clip::Talk),
        Some(Command::SetClip(AvatarKind::Male, Clip::Talk))
    );
}

#[test]
fn command_reports_its_avatar() {
    let commands = [
        Command::Move(AvatarKind::Female, Facing::Down),
        Command::Reset(AvatarKind::Female),
        Command::SetClip(AvatarKind::Female, Clip::Fall),
        Command::LoadModel(AvatarKind::Female, "x.glb".to_string()),
    ];
    for command in &commands {
        assert_eq!(command.avatar(), AvatarKind::Female);
    }
}

// ============================================================================
// Model Submission
// ============================================================================

#[test]
fn empty_draft_submits_nothing() {
    let mut overlay = Overlay::new();
    let result = submit(&mut overlay, AvatarKind::Male, "   ");
    assert!(matches!(result, Ok(None)));
    // panel stays open so the user can type
    assert_eq!(overlay.active(), Some(AvatarKind::Male));
}

#[test]
fn submit_clears_draft_and_closes_panel() {
    let mut overlay = Overlay::new();
    let command = submit(&mut overlay, AvatarKind::Male, "  https://example.com/hero.glb ")
        .unwrap()
        .unwrap();

    assert_eq!(
        command,
        Command::LoadModel(AvatarKind::Male, "https://example.com/hero.glb".to_string())
    );
    assert!(overlay.url_draft.is_empty());
    assert_eq!(overlay.active(), None);
    assert_eq!(
        overlay.loaded_url(AvatarKind::Male),
        Some("https://example.com/hero.glb")
    );
}

#[test]
fn url_in_use_by_other_avatar_is_rejected() {
    let mut overlay = Overlay::new();
    submit(&mut overlay, AvatarKind::Male, "https://example.com/hero.glb").unwrap();

    let result = submit(&mut overlay, AvatarKind::Female, "https://example.com/hero.glb ");
    assert!(matches!(result, Err(StageError::ModelInUse(AvatarKind::Male))));
    assert!(overlay.alert().is_some());
    assert_eq!(overlay.loaded_url(AvatarKind::Female), None);
    // the draft is kept so the user can fix it
    assert!(!overlay.url_draft.is_empty());

    overlay.dismiss_alert();
    assert_eq!(overlay.alert(), None);
}

#[test]
fn same_avatar_may_reload_its_url() {
    let mut overlay = Overlay::new();
    submit(&mut overlay, AvatarKind::Female, "model.glb").unwrap();
    let again = submit(&mut overlay, AvatarKind::Female, "model.glb").unwrap();
    assert!(again.is_some());
    assert_eq!(overlay.alert(), None);
}

#[test]
fn failure_frees_the_url_and_alerts() {
    let mut overlay = Overlay::new();
    submit(&mut overlay, AvatarKind::Male, "broken.glb").unwrap();

    let err = StageError::AssetLoad {
        uri: "broken.glb".to_string(),
        message: "not found".to_string(),
    };
    overlay.record_failure(AvatarKind::Male, &err);

    assert_eq!(overlay.loaded_url(AvatarKind::Male), None);
    assert!(overlay.alert().is_some_and(|a| a.contains("broken.glb")));

    // the other avatar can now take it
    let result = submit(&mut overlay, AvatarKind::Female, "broken.glb");
    assert!(matches!(result, Ok(Some(_))));
}
