//! Identity provider integration.
//!
//! [`IdentityBridge`] wraps an [`IdentityProvider`] and re-emits a single
//! canonical event whenever the authenticated identity changes, including
//! "became unauthenticated". Consumers subscribe through
//! [`IdentityBridge::observe`]; the session store is the only production
//! subscriber.

mod bridge;
mod error;
mod provider;

pub use bridge::{IdentityBridge, IdentitySubscription};
pub use error::AuthError;
pub use provider::{HttpIdentityProvider, Identity, IdentityProvider};
