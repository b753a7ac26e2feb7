use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::auth::error::AuthError;
use crate::auth::provider::{Identity, IdentityProvider};

/// Wraps the identity provider and re-emits one canonical event per
/// identity change.
///
/// Sign-in, register and sign-out delegate to the provider and, on success,
/// publish the new identity snapshot (or `None`) to every subscription.
/// Profile mirror updates refresh the held snapshot without emitting, which
/// matches the provider's own notion of a session change.
pub struct IdentityBridge {
    provider: Box<dyn IdentityProvider>,
    events: watch::Sender<Option<Identity>>,
    resolved: AtomicBool,
}

/// A live subscription to identity changes.
///
/// Dropping the subscription (or calling [`unsubscribe`](Self::unsubscribe))
/// guarantees no further delivery.
pub struct IdentitySubscription {
    rx: watch::Receiver<Option<Identity>>,
}

impl IdentitySubscription {
    /// Waits for the next identity emission and returns the snapshot.
    ///
    /// Returns `None` only if the bridge itself has been dropped.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// The most recently emitted identity, without waiting.
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    pub fn unsubscribe(self) {}
}

impl IdentityBridge {
    pub fn new(provider: Box<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            events: watch::Sender::new(None),
            resolved: AtomicBool::new(false),
        }
    }

    /// Registers a subscription for identity changes.
    ///
    /// Subscribers registered before [`resolve_initial`](Self::resolve_initial)
    /// receive the restored session as their first emission; later
    /// subscribers are notified once immediately with the current state.
    pub fn observe(&self) -> IdentitySubscription {
        let mut rx = self.events.subscribe();
        if self.resolved.load(Ordering::SeqCst) {
            rx.mark_changed();
        }
        IdentitySubscription { rx }
    }

    /// Restores any persisted provider session and emits the result.
    ///
    /// Must be called exactly once at startup; until it completes,
    /// subscribers see no emission and the session remains unresolved.
    pub async fn resolve_initial(&self) {
        let restored = self.provider.current().await;
        tracing::info!(restored = restored.is_some(), "identity session resolved");
        self.resolved.store(true, Ordering::SeqCst);
        self.events.send_replace(restored);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let identity = self.provider.sign_in(email, password).await?;
        tracing::info!(email = %identity.email, "signed in");
        self.events.send_replace(Some(identity));
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let identity = self.provider.register(email, password).await?;
        tracing::info!(email = %identity.email, "account registered");
        self.events.send_replace(Some(identity));
        Ok(())
    }

    pub async fn sign_in_federated(&self) -> Result<(), AuthError> {
        let identity = self.provider.sign_in_federated().await?;
        tracing::info!(email = %identity.email, "federated sign-in");
        self.events.send_replace(Some(identity));
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        tracing::info!("signed out");
        self.events.send_replace(None);
        Ok(())
    }

    /// Pushes name/avatar to the provider's profile mirror and refreshes
    /// the held identity snapshot without emitting a session change.
    pub async fn update_profile_mirror(
        &self,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), AuthError> {
        self.provider.update_profile(display_name, avatar_url).await?;
        self.events.send_if_modified(|current| {
            if let Some(identity) = current.as_mut() {
                if let Some(name) = display_name {
                    identity.display_name = Some(name.to_string());
                }
                if let Some(url) = avatar_url {
                    identity.avatar_url = Some(url.to_string());
                }
            }
            // Snapshot refreshed in place; not a session change.
            false
        });
        Ok(())
    }

    /// The identity as of the latest emission.
    pub fn current(&self) -> Option<Identity> {
        self.events.borrow().clone()
    }
}
