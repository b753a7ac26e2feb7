/// Marker trait for screen state objects.
///
/// States are cloned to produce successors and compared to detect changes.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
