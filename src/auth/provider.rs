use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::auth::error::AuthError;

/// The identity provider's view of an authenticated account.
///
/// `identity_id` is provider-assigned and immutable; `email` is the join
/// key against the backend profile mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub identity_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Operations the external identity provider offers.
///
/// Implementations must be safe to share across tasks; the bridge holds one
/// for the application's lifetime. Tests substitute a scripted mock.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Restores a persisted session, if the provider has one.
    async fn current(&self) -> Option<Identity>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Federated (Google) sign-in. May fail with [`AuthError::Cancelled`]
    /// when the user abandons the provider's consent flow.
    async fn sign_in_federated(&self) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Updates the provider's display name / avatar mirror.
    async fn update_profile(
        &self,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), AuthError>;
}

#[derive(Debug, Deserialize)]
struct SessionRecord {
    #[serde(rename = "identityId")]
    identity_id: String,
    email: String,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
}

/// Identity provider client over its HTTP API.
///
/// Keeps the session token issued at sign-in and sends it as a bearer on
/// session-scoped calls. The provider owns session persistence; the client
/// never writes anything to disk.
pub struct HttpIdentityProvider {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn store_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    async fn session_from(&self, resp: Response) -> Result<Identity, AuthError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::classify(status, resp).await);
        }
        let record: SessionRecord = resp
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        self.store_token(record.token.clone());
        Ok(Identity {
            identity_id: record.identity_id,
            email: record.email,
            display_name: record.display_name,
            avatar_url: record.photo_url,
        })
    }

    async fn classify(status: StatusCode, resp: Response) -> AuthError {
        let body: ErrorBody = resp.json().await.unwrap_or_default();
        if body.error.code.eq_ignore_ascii_case("cancelled") {
            return AuthError::Cancelled;
        }
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AuthError::InvalidCredentials
            }
            other => AuthError::Network(format!("identity provider returned {other}")),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current(&self) -> Option<Identity> {
        let mut req = self.http.get(self.url("/v1/sessions/current"));
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.ok()?;
        if !resp.status().is_success() {
            return None;
        }
        self.session_from(resp).await.ok()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let resp = self
            .http
            .post(self.url("/v1/sessions"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        self.session_from(resp).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let resp = self
            .http
            .post(self.url("/v1/accounts"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        self.session_from(resp).await
    }

    async fn sign_in_federated(&self) -> Result<Identity, AuthError> {
        let resp = self
            .http
            .post(self.url("/v1/sessions/federated"))
            .json(&serde_json::json!({ "provider": "google.com" }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        self.session_from(resp).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut req = self.http.delete(self.url("/v1/sessions/current"));
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::classify(status, resp).await);
        }
        self.store_token(None);
        Ok(())
    }

    async fn update_profile(
        &self,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut body = serde_json::Map::new();
        if let Some(name) = display_name {
            body.insert("displayName".to_string(), name.into());
        }
        if let Some(url) = avatar_url {
            body.insert("photoURL".to_string(), url.into());
        }

        let mut req = self.http.patch(self.url("/v1/profile")).json(&body);
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::classify(status, resp).await);
        }
        Ok(())
    }
}
