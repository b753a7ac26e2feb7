use super::intent::Intent;
use super::state::UiState;

/// The only place a screen's state transitions happen.
///
/// `reduce` must be a pure function with no side effects; anything that
/// talks to the network is spawned by the app loop and comes back as
/// another intent.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
