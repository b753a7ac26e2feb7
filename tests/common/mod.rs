//! Shared test utilities and mocks.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;
pub mod mock_identity;

use std::sync::Arc;
use std::time::Duration;

use homehero::api::{ApiClient, RetryPolicy};
use homehero::auth::IdentityBridge;
use homehero::session::{SessionState, SessionStore};
use tokio::sync::watch;

use mock_identity::MockIdentityProvider;

/// Client with a small, fast retry budget for tests.
pub fn make_api(base_url: &str) -> Arc<ApiClient> {
    make_api_with(base_url, 2, 10)
}

pub fn make_api_with(base_url: &str, max_attempts: u32, delay_ms: u64) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::new(
            base_url,
            RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(delay_ms),
            },
            Duration::from_secs(5),
        )
        .expect("client"),
    )
}

/// Wires a session store to a scripted provider and a mock backend, and
/// spawns its event loop.
pub fn make_session_store(
    provider: MockIdentityProvider,
    api: Arc<ApiClient>,
) -> (Arc<SessionStore>, Arc<IdentityBridge>) {
    let bridge = Arc::new(IdentityBridge::new(Box::new(provider)));
    let store = SessionStore::new(Arc::clone(&bridge), api);
    tokio::spawn(Arc::clone(&store).run());
    (store, bridge)
}

/// Waits until the session state satisfies `pred`, or panics after 2s.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<SessionState>,
    pred: impl Fn(&SessionState) -> bool,
) -> SessionState {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        {
            let state = rx.borrow_and_update().clone();
            if pred(&state) {
                return state;
            }
        }
        let remaining = deadline
            .checked_duration_since(tokio::time::Instant::now())
            .expect("timed out waiting for session state");
        tokio::time::timeout(remaining, rx.changed())
            .await
            .expect("timed out waiting for session state")
            .expect("session store dropped");
    }
}
