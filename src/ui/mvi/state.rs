//! Marker trait for reducer state.

/// State values are cheap to clone, comparable, and have a resting default
/// that `std::mem::take` can leave behind during dispatch.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
