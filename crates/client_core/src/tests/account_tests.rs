use std::sync::Arc;

use shared::domain::UserId;

use super::*;
use crate::{
    error::ScreenError,
    test_support::{context, Call, FakeDataAccess, NavAction, Op, RecordingNavigator, SELF_ID},
};

fn screen(data: FakeDataAccess) -> (AccountSettingsScreen, Arc<FakeDataAccess>, Arc<RecordingNavigator>) {
    let data = Arc::new(data);
    let nav = Arc::new(RecordingNavigator::default());
    (
        AccountSettingsScreen::new(context(data.clone(), nav.clone()), Route::Profile),
        data,
        nav,
    )
}

#[test]
fn password_length_rules() {
    assert_eq!(validate_password(""), Ok(None));
    for short in ["a", "abc", "1234567"] {
        assert_eq!(
            validate_password(short),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
    }
    assert_eq!(
        validate_password("12345678"),
        Ok(Some("12345678".to_string()))
    );
    // Counted in characters, not bytes.
    assert!(validate_password("ééééééé").is_err());
}

#[test]
fn submit_enabled_when_any_field_is_staged() {
    let mut draft = ProfileDraft::default();
    assert!(!draft.can_submit());

    draft.name = "Alice".into();
    assert!(draft.can_submit());

    let draft = ProfileDraft {
        image_ref: "file:///tmp/me.jpg".into(),
        ..ProfileDraft::default()
    };
    assert!(draft.can_submit());

    let draft = ProfileDraft {
        password: "x".into(),
        ..ProfileDraft::default()
    };
    assert!(draft.can_submit());
}

#[test]
fn unchanged_fields_are_left_out_of_the_edit() {
    let draft = ProfileDraft {
        name: "Alice".into(),
        ..ProfileDraft::default()
    };
    assert_eq!(
        draft.to_edit(),
        Ok(ProfileEdit {
            name: Some("Alice".into()),
            image_ref: None,
            password: None,
        })
    );
}

#[tokio::test]
async fn short_password_is_rejected_without_remote_call_or_loading() {
    let (mut screen, data, nav) = screen(FakeDataAccess::new());
    let mut rx = screen.subscribe_events();
    screen.set_name("Alice");
    screen.set_password("short");

    screen.submit_edit().await;

    assert!(data.calls().is_empty());
    assert!(nav.actions().is_empty());
    assert_eq!(
        screen.phase(),
        &Phase::Error(ScreenError::Validation(ValidationError::PasswordTooShort {
            min: 8
        }))
    );
    let alert = screen.alert().expect("alert");
    assert_eq!(alert.title.as_deref(), Some(INVALID_PASSWORD_TITLE));
    assert_eq!(alert.message, "Passwords must be at least 8 characters long");
    assert_eq!(screen.draft().password, "");
    assert_eq!(screen.draft().name, "Alice");

    let mut saw_loading = false;
    while let Ok(event) = rx.try_recv() {
        if let ScreenEvent::PhaseChanged {
            phase: Phase::Loading,
            ..
        } = event
        {
            saw_loading = true;
        }
    }
    assert!(!saw_loading);
}

#[tokio::test]
async fn valid_edit_sends_only_staged_fields_and_returns() {
    let (mut screen, data, nav) = screen(FakeDataAccess::new());
    screen.set_name("Alice");
    screen.set_password("correct horse");

    screen.submit_edit().await;

    assert_eq!(
        data.calls(),
        vec![Call::EditUser(
            UserId::new(SELF_ID),
            ProfileEdit {
                name: Some("Alice".into()),
                image_ref: None,
                password: Some("correct horse".into()),
            }
        )]
    );
    assert!(!screen.is_loading());
    assert_eq!(nav.actions(), vec![NavAction::Navigate(Route::Profile)]);
    assert!(!screen.can_submit());
}

#[tokio::test]
async fn failed_edit_clears_loading_and_stays_put() {
    let (mut screen, data, nav) = screen(FakeDataAccess::new().failing(Op::EditUser, 500));
    screen.set_image("file:///tmp/me.jpg");

    screen.submit_edit().await;

    assert_eq!(data.calls().len(), 1);
    assert!(!screen.is_loading());
    assert!(matches!(
        screen.phase(),
        Phase::Error(ScreenError::RemoteFailure {
            step: ChainStep::EditUser,
            ..
        })
    ));
    assert!(nav.actions().is_empty());
    // Draft is kept so the user can try again by hand.
    assert_eq!(screen.draft().image_ref, "file:///tmp/me.jpg");
}

#[tokio::test]
async fn empty_draft_submit_is_a_no_op() {
    let (mut screen, data, _) = screen(FakeDataAccess::new());

    screen.submit_edit().await;

    assert!(data.calls().is_empty());
    assert_eq!(screen.phase(), &Phase::Idle);
}
