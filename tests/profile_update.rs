//! Profile edits: dual-write ordering, merge precedence and rollback.

mod common;

use std::sync::Arc;

use common::mock_backend::{MockBackend, MockResponse};
use common::mock_identity::{identity, MockIdentityProvider};
use common::{make_api, make_session_store, wait_for_state};
use homehero::api::models::ProfileUpdate;
use homehero::auth::{AuthError, IdentityBridge};
use homehero::session::SessionStore;

const PROFILE: &str = r#"{"name": "Old Name", "lastLoginAt": "2026-08-20T10:00:00Z"}"#;

async fn signed_in_store(
    backend: &MockBackend,
    provider: MockIdentityProvider,
) -> (Arc<SessionStore>, Arc<IdentityBridge>) {
    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(PROFILE))
        .await;
    let provider = provider.with_restored(identity("a@x.com", Some("Provider Name")));
    let (store, bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();
    bridge.resolve_initial().await;
    wait_for_state(&mut rx, |s| s.is_authenticated()).await;
    (store, bridge)
}

fn update(name: &str) -> ProfileUpdate {
    ProfileUpdate {
        name: Some(name.to_string()),
        photo_url: None,
    }
}

#[tokio::test]
async fn submitted_fields_win_over_the_backend_echo() {
    let backend = MockBackend::start().await;
    let (store, _bridge) =
        signed_in_store(&backend, MockIdentityProvider::new().push_update(Ok(()))).await;

    // The backend acknowledges the write but echoes a lagging record.
    backend
        .enqueue(
            "/users/email/a@x.com",
            MockResponse::json(r#"{"name": "Stale Echo", "lastLoginAt": "2026-08-21T09:00:00Z"}"#),
        )
        .await;

    store.update_profile(update("Just Edited")).await.unwrap();

    let state = store.snapshot();
    assert!(!state.loading);
    let user = state.user.unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Just Edited"));
    // Non-submitted backend fields still land.
    assert_eq!(user.last_login_at.as_deref(), Some("2026-08-21T09:00:00Z"));
}

#[tokio::test]
async fn backend_rejection_restores_the_previous_state() {
    let backend = MockBackend::start().await;
    let (store, _bridge) =
        signed_in_store(&backend, MockIdentityProvider::new().push_update(Ok(()))).await;

    backend
        .enqueue("/users/email/a@x.com", MockResponse::error(403, "nope"))
        .await;

    let err = store.update_profile(update("Rejected Name")).await.unwrap_err();
    assert!(matches!(err, AuthError::UpdateRejected(_)));

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(
        state.user.unwrap().display_name.as_deref(),
        Some("Old Name"),
        "a failed update must leave the session untouched"
    );
}

#[tokio::test]
async fn provider_mirror_failure_skips_the_backend_write() {
    let backend = MockBackend::start().await;
    let (store, _bridge) = signed_in_store(
        &backend,
        MockIdentityProvider::new().push_update(Err(AuthError::Network("offline".to_string()))),
    )
    .await;

    let err = store.update_profile(update("New Name")).await.unwrap_err();
    assert!(matches!(err, AuthError::Network(_)));

    let patches = backend
        .requests_for("/users/email/a@x.com")
        .await
        .into_iter()
        .filter(|r| r.method == "PATCH")
        .count();
    assert_eq!(patches, 0, "backend must not be written when the mirror fails");
    assert_eq!(
        store.snapshot().user.unwrap().display_name.as_deref(),
        Some("Old Name")
    );
}

#[tokio::test]
async fn update_requires_a_signed_in_user() {
    let backend = MockBackend::start().await;
    let (store, bridge) =
        make_session_store(MockIdentityProvider::new(), make_api(&backend.base_url()));
    let mut rx = store.subscribe();
    bridge.resolve_initial().await;
    wait_for_state(&mut rx, |s| !s.loading).await;

    let err = store.update_profile(update("Nobody")).await.unwrap_err();
    assert_eq!(err, AuthError::NotAuthenticated);
}

#[tokio::test]
async fn update_sends_the_patch_body_the_backend_expects() {
    let backend = MockBackend::start().await;
    let (store, _bridge) =
        signed_in_store(&backend, MockIdentityProvider::new().push_update(Ok(()))).await;

    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(r#"{"name": "New Name"}"#))
        .await;

    store
        .update_profile(ProfileUpdate {
            name: Some("New Name".to_string()),
            photo_url: Some("https://img/x.png".to_string()),
        })
        .await
        .unwrap();

    let patch = backend
        .requests_for("/users/email/a@x.com")
        .await
        .into_iter()
        .find(|r| r.method == "PATCH")
        .expect("backend received the profile patch");
    let body = patch.json_body();
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["photoURL"], "https://img/x.png");
}
