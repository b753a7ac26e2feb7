//! Scripted identity provider for session tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use homehero::auth::{AuthError, Identity, IdentityProvider};

pub fn identity(email: &str, name: Option<&str>) -> Identity {
    Identity {
        identity_id: format!("uid-{email}"),
        email: email.to_string(),
        display_name: name.map(String::from),
        avatar_url: None,
    }
}

/// Identity provider whose answers are scripted up front.
///
/// Queues pop one result per call; an empty queue fails the call, which
/// catches tests making more provider calls than they scripted.
#[derive(Default)]
pub struct MockIdentityProvider {
    restored: Mutex<Option<Identity>>,
    sign_in: Mutex<VecDeque<Result<Identity, AuthError>>>,
    register: Mutex<VecDeque<Result<Identity, AuthError>>>,
    federated: Mutex<VecDeque<Result<Identity, AuthError>>>,
    sign_out: Mutex<VecDeque<Result<(), AuthError>>>,
    update: Mutex<VecDeque<Result<(), AuthError>>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restored(self, identity: Identity) -> Self {
        *self.restored.lock().unwrap() = Some(identity);
        self
    }

    pub fn push_sign_in(self, result: Result<Identity, AuthError>) -> Self {
        self.sign_in.lock().unwrap().push_back(result);
        self
    }

    pub fn push_register(self, result: Result<Identity, AuthError>) -> Self {
        self.register.lock().unwrap().push_back(result);
        self
    }

    pub fn push_federated(self, result: Result<Identity, AuthError>) -> Self {
        self.federated.lock().unwrap().push_back(result);
        self
    }

    pub fn push_sign_out(self, result: Result<(), AuthError>) -> Self {
        self.sign_out.lock().unwrap().push_back(result);
        self
    }

    pub fn push_update(self, result: Result<(), AuthError>) -> Self {
        self.update.lock().unwrap().push_back(result);
        self
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, AuthError>>>) -> Result<T, AuthError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::Network("unscripted provider call".to_string())))
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current(&self) -> Option<Identity> {
        self.restored.lock().unwrap().clone()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Self::pop(&self.sign_in)
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Self::pop(&self.register)
    }

    async fn sign_in_federated(&self) -> Result<Identity, AuthError> {
        Self::pop(&self.federated)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Self::pop(&self.sign_out)
    }

    async fn update_profile(
        &self,
        _display_name: Option<&str>,
        _avatar_url: Option<&str>,
    ) -> Result<(), AuthError> {
        Self::pop(&self.update)
    }
}
