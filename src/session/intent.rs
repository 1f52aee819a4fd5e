//! Intents for the SDK session lifecycle.

use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum SessionIntent {
    /// `init` was issued.
    Begin,

    /// `init` resolved.
    Succeeded,

    /// `init` rejected.
    Failed { reason: String },

    /// Back to `Uninitialized` from any state.
    Reset,
}

impl Intent for SessionIntent {}
