//! Session lifecycle: resolution, login, fallback and ordering.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::mock_backend::{MockBackend, MockResponse};
use common::mock_identity::{identity, MockIdentityProvider};
use common::{make_api, make_session_store, wait_for_state};
use homehero::auth::{AuthError, IdentityBridge};
use homehero::session::SessionStore;

const PROFILE: &str = r#"{"name": "Backend Name", "lastLoginAt": "2026-08-20T10:00:00Z", "memberTier": "gold"}"#;

#[tokio::test]
async fn restored_session_resolves_at_startup() {
    let backend = MockBackend::start().await;
    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(PROFILE))
        .await;

    let provider =
        MockIdentityProvider::new().with_restored(identity("a@x.com", Some("Provider Name")));
    let (store, bridge) = make_session_store(provider, make_api(&backend.base_url()));

    let mut rx = store.subscribe();
    assert!(rx.borrow().loading, "starts in the resolving state");

    bridge.resolve_initial().await;

    let state = wait_for_state(&mut rx, |s| s.is_authenticated()).await;
    let user = state.user.unwrap();
    // Backend profile wins over the provider record.
    assert_eq!(user.display_name.as_deref(), Some("Backend Name"));
    assert_eq!(user.last_login_at.as_deref(), Some("2026-08-20T10:00:00Z"));
    assert_eq!(user.extra["memberTier"], "gold");
}

#[tokio::test]
async fn no_restored_session_resolves_to_anonymous() {
    let backend = MockBackend::start().await;
    let (store, bridge) =
        make_session_store(MockIdentityProvider::new(), make_api(&backend.base_url()));

    let mut rx = store.subscribe();
    bridge.resolve_initial().await;

    let state = wait_for_state(&mut rx, |s| !s.loading).await;
    assert!(!state.is_authenticated());
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn sign_in_merges_backend_profile() {
    let backend = MockBackend::start().await;
    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(PROFILE))
        .await;

    let provider = MockIdentityProvider::new()
        .push_sign_in(Ok(identity("a@x.com", Some("Provider Name"))));
    let (store, _bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    store.sign_in("a@x.com", "hunter2").await.unwrap();

    let state = wait_for_state(&mut rx, |s| s.is_authenticated() && !s.loading).await;
    assert_eq!(state.user.unwrap().display_name.as_deref(), Some("Backend Name"));
}

#[tokio::test]
async fn profile_fetch_failure_falls_back_to_provider_fields() {
    let backend = MockBackend::start().await;
    backend
        .enqueue("/users/email/a@x.com", MockResponse::error(500, "boom"))
        .await;

    let provider = MockIdentityProvider::new()
        .push_sign_in(Ok(identity("a@x.com", Some("Provider Name"))));
    let (store, _bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    store.sign_in("a@x.com", "hunter2").await.unwrap();

    let state = wait_for_state(&mut rx, |s| s.is_authenticated()).await;
    let user = state.user.unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Provider Name"));
    // Backend-owned fields stay unknown rather than failing the login.
    assert!(user.last_login_at.is_none());
    assert!(user.extra.is_empty());
}

#[tokio::test]
async fn failed_sign_in_restores_previous_state() {
    let backend = MockBackend::start().await;
    let provider = MockIdentityProvider::new().push_sign_in(Err(AuthError::InvalidCredentials));
    let (store, bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    bridge.resolve_initial().await;
    wait_for_state(&mut rx, |s| !s.loading).await;

    let err = store.sign_in("a@x.com", "wrong").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);

    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.loading, "mutating window closed on failure");
}

#[tokio::test]
async fn sign_out_clears_the_session() {
    let backend = MockBackend::start().await;
    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(PROFILE))
        .await;

    let provider = MockIdentityProvider::new()
        .with_restored(identity("a@x.com", Some("Provider Name")))
        .push_sign_out(Ok(()));
    let (store, bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    bridge.resolve_initial().await;
    wait_for_state(&mut rx, |s| s.is_authenticated()).await;

    store.log_out().await.unwrap();
    let state = wait_for_state(&mut rx, |s| !s.is_authenticated() && !s.loading).await;
    assert!(state.user.is_none());
}

#[tokio::test]
async fn sign_in_before_the_event_loop_starts_is_not_lost() {
    let backend = MockBackend::start().await;
    backend
        .enqueue("/users/email/a@x.com", MockResponse::json(PROFILE))
        .await;

    let provider = MockIdentityProvider::new()
        .push_sign_in(Ok(identity("a@x.com", Some("Provider Name"))));
    let bridge = Arc::new(IdentityBridge::new(Box::new(provider)));
    let store = SessionStore::new(Arc::clone(&bridge), make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    // The identity event lands before anything polls the store's loop.
    store.sign_in("a@x.com", "hunter2").await.unwrap();
    tokio::spawn(Arc::clone(&store).run());

    let state = wait_for_state(&mut rx, |s| s.is_authenticated()).await;
    assert_eq!(state.user.unwrap().email, "a@x.com");
}

#[tokio::test]
async fn stale_profile_fetch_cannot_resurrect_a_session() {
    let backend = MockBackend::start().await;
    // The profile answer for the sign-in arrives only after the sign-out.
    backend
        .enqueue(
            "/users/email/a@x.com",
            MockResponse::json(PROFILE).with_delay(300),
        )
        .await;

    let provider = MockIdentityProvider::new()
        .push_sign_in(Ok(identity("a@x.com", Some("Provider Name"))))
        .push_sign_out(Ok(()));
    let (store, _bridge) = make_session_store(provider, make_api(&backend.base_url()));
    let mut rx = store.subscribe();

    store.sign_in("a@x.com", "hunter2").await.unwrap();

    // Make sure the slow profile fetch is actually in flight before the
    // sign-out supersedes it.
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while backend.requests_for("/users/email/a@x.com").await.is_empty() {
        assert!(std::time::Instant::now() < deadline, "profile fetch never started");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    store.log_out().await.unwrap();
    wait_for_state(&mut rx, |s| !s.is_authenticated() && !s.loading).await;

    // Let the stale fetch resolve; it must be discarded.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!store.snapshot().is_authenticated());
}
