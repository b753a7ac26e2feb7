use crate::api::models::{ProfileUpdate, UserProfile};
use crate::auth::Identity;

/// The single authoritative representation of who is using the app.
///
/// Built by joining the identity provider record with the backend profile
/// mirror on `email`. Backend fields win over provider fields for any
/// overlapping attribute, except immediately after a local profile edit,
/// where the submitted values win until the next full resync.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUser {
    /// Provider-assigned, immutable.
    pub identity_id: String,
    /// Join key between the identity provider and the backend profile.
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Backend-owned; absent when the profile fetch fell back to
    /// provider-only data.
    pub last_login_at: Option<String>,
    /// Backend-owned fields the client passes through without
    /// interpretation.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NormalizedUser {
    /// Provider-only fallback, used when the backend profile fetch fails.
    /// Backend-owned fields are absent and the UI treats them as unknown.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            identity_id: identity.identity_id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            avatar_url: identity.avatar_url.clone(),
            last_login_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Full merge: backend fields take precedence over provider fields.
    pub fn merged(identity: &Identity, profile: UserProfile) -> Self {
        Self {
            identity_id: identity.identity_id.clone(),
            email: identity.email.clone(),
            display_name: profile.name.or_else(|| identity.display_name.clone()),
            avatar_url: profile.photo_url.or_else(|| identity.avatar_url.clone()),
            last_login_at: profile.last_login_at,
            extra: profile.extra,
        }
    }

    /// Merge after a local profile edit: the backend's returned record is
    /// shallow-merged over the previous user, then the just-submitted
    /// fields win for any overlapping key. The backend may lag the write it
    /// just acknowledged, so the submitted values are the freshest truth.
    pub fn apply_update(self, backend: UserProfile, submitted: &ProfileUpdate) -> Self {
        let mut extra = self.extra;
        for (key, value) in backend.extra {
            extra.insert(key, value);
        }

        let mut updated = Self {
            identity_id: self.identity_id,
            email: self.email,
            display_name: backend.name.or(self.display_name),
            avatar_url: backend.photo_url.or(self.avatar_url),
            last_login_at: backend.last_login_at.or(self.last_login_at),
            extra,
        };
        if let Some(name) = &submitted.name {
            updated.display_name = Some(name.clone());
        }
        if let Some(url) = &submitted.photo_url {
            updated.avatar_url = Some(url.clone());
        }
        updated
    }

    /// Name to show in the UI; falls back to the email's local part.
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or("user").to_string())
    }
}
