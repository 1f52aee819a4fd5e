//! Crate-level error taxonomy.
//!
//! Each module reports its own error type; the coordinator folds them into
//! [`AppError`] so exactly one "current error" can be shown at a time.

use std::sync::Arc;

use thiserror::Error;

use crate::allowance::AllowanceError;
use crate::balance::{BalanceError, PartialDataError};
use crate::config::ConfigError;
use crate::sdk::SdkError;
use crate::session::SessionError;
use crate::wallet::WalletError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("No wallet provider detected. Please install a browser wallet.")]
    NoProvider,

    #[error("Wallet request was rejected by the user")]
    UserRejected,

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Invalid account address '{address}'")]
    InvalidAddress { address: String },

    #[error(transparent)]
    Wallet(WalletError),

    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("CA SDK not initialized (session is {state})")]
    SessionNotReady { state: &'static str },

    #[error(transparent)]
    SessionInit(SessionError),

    #[error(transparent)]
    BalanceFetch(#[from] BalanceError),

    #[error(transparent)]
    PartialData(#[from] PartialDataError),

    #[error(transparent)]
    InvalidAllowance(AllowanceError),

    #[error("Chain {chain_id} is not supported")]
    UnknownChain { chain_id: u64 },

    #[error(transparent)]
    AllowanceSubmit(AllowanceError),

    #[error("Transaction failed: {source}")]
    Intent {
        operation: &'static str,
        #[source]
        source: SdkError,
    },

    #[error("Background {task} failed: {message}")]
    TaskFailed { task: &'static str, message: String },

    #[error(transparent)]
    Config(Arc<ConfigError>),
}

impl AppError {
    /// A failed `transfer`, `bridge` or `request` call.
    pub fn intent(operation: &'static str, source: SdkError) -> Self {
        match source {
            SdkError::UserRejected => Self::UserRejected,
            source => Self::Intent { operation, source },
        }
    }

    /// True for errors raised before any wallet or SDK call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::SessionNotReady { .. } | Self::NoProvider
        )
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NoProvider => Self::NoProvider,
            WalletError::UserRejected => Self::UserRejected,
            WalletError::NoAccounts => Self::NoAccounts,
            WalletError::InvalidAddress { address } => Self::InvalidAddress { address },
            other @ WalletError::Rpc { .. } => Self::Wallet(other),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotReady { state } => Self::SessionNotReady { state },
            other => Self::SessionInit(other),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Arc::new(err))
    }
}

impl From<AllowanceError> for AppError {
    fn from(err: AllowanceError) -> Self {
        match err {
            AllowanceError::UnknownChain { chain_id } => Self::UnknownChain { chain_id },
            err @ AllowanceError::Submit { .. } => Self::AllowanceSubmit(err),
            err => Self::InvalidAllowance(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_errors_map_onto_taxonomy() {
        assert!(matches!(AppError::from(WalletError::NoProvider), AppError::NoProvider));
        assert!(matches!(
            AppError::from(WalletError::InvalidAddress {
                address: "0x12".into()
            }),
            AppError::InvalidAddress { .. }
        ));
        assert!(matches!(
            AppError::from(WalletError::Rpc {
                code: -32603,
                message: "internal".into()
            }),
            AppError::Wallet(_)
        ));
    }

    #[test]
    fn not_ready_is_a_precondition() {
        let err = AppError::from(SessionError::NotReady {
            state: "Initializing",
        });
        assert!(err.is_precondition());
        assert!(!AppError::from(SessionError::AlreadyInitializing).is_precondition());
    }

    #[test]
    fn rejected_intent_is_user_rejection() {
        assert!(matches!(
            AppError::intent("transfer", SdkError::UserRejected),
            AppError::UserRejected
        ));
        let err = AppError::intent("bridge", SdkError::failed("bridge", "no route"));
        assert_eq!(err.to_string(), "Transaction failed: bridge failed: no route");
    }

    #[test]
    fn allowance_errors_split_by_kind() {
        assert!(matches!(
            AppError::from(AllowanceError::UnknownChain { chain_id: 5 }),
            AppError::UnknownChain { chain_id: 5 }
        ));
        assert!(matches!(
            AppError::from(AllowanceError::InvalidAmount { input: "0".into() }),
            AppError::InvalidAllowance(_)
        ));
    }
}
