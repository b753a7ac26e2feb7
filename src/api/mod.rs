//! Typed client for the HomeHero REST backend.
//!
//! Collection reads go through [`retry::with_retry`] to absorb the backend
//! host's cold starts. Mutations are never retried: a failed user action
//! surfaces immediately and leaves prior state unchanged.

mod client;
mod error;
pub mod models;
mod retry;

pub use client::ApiClient;
pub use error::{ApiError, FetchError};
pub use retry::{with_retry, RetryPolicy};
