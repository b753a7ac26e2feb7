//! Client-side session state.
//!
//! One [`SessionState`] exists per application run, owned by
//! [`SessionStore`] and published through a watch channel. The store keeps
//! it consistent with identity-provider events and the backend profile
//! mirror.

mod state;
mod store;
mod user;

pub use state::SessionState;
pub use store::SessionStore;
pub use user::NormalizedUser;
