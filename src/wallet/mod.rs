//! Wallet Provider Adapter.
//!
//! Wraps an injected EIP-1193 style wallet provider. The adapter never
//! retries: a missing provider is terminal and a user rejection is
//! surfaced to the caller as-is.

mod address;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use address::AccountAddress;

/// EIP-1193 error code for "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors that can occur while talking to the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("No wallet provider found. Please install MetaMask or another wallet.")]
    NoProvider,

    #[error("Wallet connection was rejected by the user")]
    UserRejected,

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Invalid account address '{address}'")]
    InvalidAddress { address: String },

    #[error("Wallet request failed ({code}): {message}")]
    Rpc { code: i64, message: String },
}

/// An injected wallet provider, queried through `eth_accounts` and
/// `eth_requestAccounts`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_accounts`: already-authorized accounts, possibly empty.
    async fn eth_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// `eth_requestAccounts`: prompts the user for access.
    async fn eth_request_accounts(&self) -> Result<Vec<String>, WalletError>;
}

/// Adapter over an optional wallet provider.
#[derive(Clone, Default)]
pub struct WalletAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl WalletAdapter {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    pub fn with_provider(provider: Arc<dyn WalletProvider>) -> Self {
        Self::new(Some(provider))
    }

    /// The provider handle, for binding into the SDK.
    pub fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.provider.clone()
    }

    /// Whether a provider is present. Side-effect free.
    pub fn detect(&self) -> bool {
        self.provider.is_some()
    }

    /// Prompts the user for account access.
    ///
    /// Returns a non-empty, ordered list of raw addresses.
    pub async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;
        let accounts = provider
            .eth_request_accounts()
            .await
            .map_err(normalize_rejection)?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(accounts)
    }

    /// Passive check of already-authorized accounts. Empty when none.
    pub async fn query_accounts(&self) -> Result<Vec<String>, WalletError> {
        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;
        provider.eth_accounts().await.map_err(normalize_rejection)
    }
}

fn normalize_rejection(err: WalletError) -> WalletError {
    match err {
        WalletError::Rpc { code, .. } if code == USER_REJECTED_CODE => WalletError::UserRejected,
        other => other,
    }
}
