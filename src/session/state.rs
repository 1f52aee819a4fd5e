//! State for the SDK session lifecycle.

use crate::ui::mvi::UiState;

/// SDK session lifecycle.
///
/// `Uninitialized → Initializing → {Ready | Failed}`. Leaving `Failed`
/// requires an explicit reset back to `Uninitialized`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,

    /// `init` is in flight.
    Initializing,

    /// Requests may be issued.
    Ready,

    Failed {
        reason: String,
    },
}

impl UiState for SessionState {}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// Short name used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}
