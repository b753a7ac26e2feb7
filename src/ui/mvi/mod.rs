//! Model-View-Intent (MVI) primitives for screen state.
//!
//! Screens with real transitions (forms, filters) keep their state behind a
//! reducer: a pure function from `(State, Intent)` to `State`. The view
//! renders whatever the state says; input handling only translates keys
//! into intents.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
