//! HomeHero terminal client.
//!
//! A ratatui front end for the HomeHero home-services marketplace.
//! The client is a thin presentation layer over two remote collaborators:
//! the HomeHero REST backend and an external identity provider. Everything
//! with real semantics lives in four places:
//!
//! - [`api`] — typed backend client with bounded retry for reads
//! - [`auth`] — identity provider bridge emitting canonical session events
//! - [`session`] — the single per-run session state and its state machine
//! - [`ui::gate`] — route admission based on session state

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod session;
pub mod ui;
