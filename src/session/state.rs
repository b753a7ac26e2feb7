use crate::session::user::NormalizedUser;

/// The single reactive session snapshot.
///
/// `loading` is true only during the initial resolution window and while an
/// explicit login/register/logout/profile-update is in flight. During such
/// a mutation the previous `user` is retained until the operation resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<NormalizedUser>,
    pub loading: bool,
}

impl SessionState {
    /// Initial state: the provider has not yet reported whether a session
    /// exists.
    pub fn resolving() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn authenticated(user: NormalizedUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    /// The transient sub-state during an explicit session mutation.
    pub fn into_mutating(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Email of the signed-in user, if any.
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::resolving()
    }
}
