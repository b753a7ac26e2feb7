use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::api::models::ProfileUpdate;
use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthError, Identity, IdentityBridge, IdentitySubscription};
use crate::session::state::SessionState;
use crate::session::user::NormalizedUser;

/// Owner of the application's single session state.
///
/// State machine: Resolving (initial) → Anonymous | Authenticated, with a
/// transient Mutating window (loading=true, previous user retained) during
/// explicit login/register/logout/profile-update operations.
///
/// Identity events are processed in emission order, but the profile fetch
/// each one triggers resolves on its own schedule. Every fetch is tagged
/// with an epoch captured at the triggering event and its result is
/// discarded if the epoch is no longer the latest, so a slow fetch for a
/// superseded identity can never clobber the current session.
pub struct SessionStore {
    bridge: Arc<IdentityBridge>,
    api: Arc<ApiClient>,
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
    // Subscribed at construction so identity events emitted before the run
    // task is first polled are still delivered; run() takes it.
    events: Mutex<Option<IdentitySubscription>>,
}

impl SessionStore {
    pub fn new(bridge: Arc<IdentityBridge>, api: Arc<ApiClient>) -> Arc<Self> {
        let events = Mutex::new(Some(bridge.observe()));
        Arc::new(Self {
            bridge,
            api,
            state: watch::Sender::new(SessionState::resolving()),
            epoch: AtomicU64::new(0),
            events,
        })
    }

    /// Subscribe to session changes. Consumers re-evaluate on every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The current session snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Drives the store from identity events for the application's
    /// lifetime. Spawn exactly once.
    pub async fn run(self: Arc<Self>) {
        let subscription = self.events.lock().expect("subscription lock poisoned").take();
        let Some(mut events) = subscription else {
            tracing::warn!("session store loop started twice, ignoring");
            return;
        };
        while let Some(identity) = events.next().await {
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            match identity {
                None => {
                    tracing::debug!(epoch, "identity cleared, session anonymous");
                    self.state.send_replace(SessionState::anonymous());
                }
                Some(identity) => {
                    let store = Arc::clone(&self);
                    tokio::spawn(async move {
                        store.resolve_profile(identity, epoch).await;
                    });
                }
            }
        }
    }

    /// Merges the backend profile into the identity, falling back to
    /// provider-only fields when the fetch fails. "Not found" and network
    /// errors are deliberately treated alike.
    async fn resolve_profile(&self, identity: Identity, epoch: u64) {
        let user = match self.api.get_profile(&identity.email).await {
            Ok(profile) => NormalizedUser::merged(&identity, profile),
            Err(err) => {
                tracing::warn!(
                    email = %identity.email,
                    error = %err,
                    "profile fetch failed, falling back to provider fields"
                );
                NormalizedUser::from_identity(&identity)
            }
        };

        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(email = %user.email, epoch, "stale profile resolution discarded");
            return;
        }

        tracing::info!(email = %user.email, "session authenticated");
        self.state.send_replace(SessionState::authenticated(user));
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.mutate(self.bridge.sign_in(email, password)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.mutate(self.bridge.register(email, password)).await
    }

    pub async fn sign_in_federated(&self) -> Result<(), AuthError> {
        self.mutate(self.bridge.sign_in_federated()).await
    }

    /// Signs out. On failure the state is left unchanged and the error is
    /// returned to the caller; there is no automatic retry.
    pub async fn log_out(&self) -> Result<(), AuthError> {
        self.mutate(self.bridge.sign_out()).await
    }

    /// Updates display name / avatar on both the backend profile and the
    /// provider mirror.
    ///
    /// On success the returned backend record is shallow-merged over the
    /// previous user with the submitted fields winning. On any failure the
    /// prior state is restored untouched.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), AuthError> {
        let prev = self.snapshot();
        let Some(user) = prev.user.clone() else {
            return Err(AuthError::NotAuthenticated);
        };

        self.state.send_replace(prev.clone().into_mutating());

        // Provider mirror first, matching the order profile edits have
        // always been applied in.
        if let Err(err) = self
            .bridge
            .update_profile_mirror(update.name.as_deref(), update.photo_url.as_deref())
            .await
        {
            self.state.send_replace(prev);
            return Err(err);
        }

        match self.api.update_profile(&user.email, &update).await {
            Ok(backend) => {
                let merged = user.apply_update(backend, &update);
                self.state.send_replace(SessionState::authenticated(merged));
                Ok(())
            }
            Err(err) => {
                self.state.send_replace(prev);
                Err(match err {
                    ApiError::Status { status, message } => {
                        AuthError::UpdateRejected(format!("{status}: {message}"))
                    }
                    other => AuthError::Network(other.to_string()),
                })
            }
        }
    }

    /// Runs a session mutation inside the Mutating window: loading flips on
    /// with the previous user retained, and on failure the prior state is
    /// restored exactly.
    async fn mutate(
        &self,
        op: impl std::future::Future<Output = Result<(), AuthError>>,
    ) -> Result<(), AuthError> {
        let prev = self.snapshot();
        self.state.send_replace(prev.clone().into_mutating());
        match op.await {
            // The identity event emitted by the bridge completes the
            // transition to Anonymous or Authenticated.
            Ok(()) => Ok(()),
            Err(err) => {
                self.state.send_replace(prev);
                Err(err)
            }
        }
    }
}
