use thiserror::Error;

/// Errors surfaced by identity operations.
///
/// Every variant is shown to the user through a blocking dialog; none of
/// these are swallowed for user-initiated actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Identity provider unreachable: {0}")]
    Network(String),

    #[error("Sign-in was cancelled")]
    Cancelled,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Profile update rejected: {0}")]
    UpdateRejected(String),
}
