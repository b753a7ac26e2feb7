//! Terminal front end.

pub mod app;
pub mod events;
pub mod gate;
pub mod mvi;
pub mod screens;
pub mod terminal_guard;
pub mod theme;
