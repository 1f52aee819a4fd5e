//! Marker trait for intents.

/// An action fed into a reducer: a user action (connect, close popup) or
/// an asynchronous outcome (accounts resolved, init finished).
pub trait Intent: Send + 'static {}
