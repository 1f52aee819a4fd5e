use crate::ui::mvi::UiState;
use crate::wallet::AccountAddress;

/// Whether a wallet account is attached to the app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Waiting on the wallet's account prompt or the session init.
    Connecting,
    Connected(AccountAddress),
}

impl UiState for ConnectionState {}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    pub fn account(&self) -> Option<&AccountAddress> {
        match self {
            Self::Connected(account) => Some(account),
            _ => None,
        }
    }
}
