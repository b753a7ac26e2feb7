/// Marker trait for intents: user actions or completed async effects that
/// a reducer folds into new state.
pub trait Intent: Send + 'static {}
