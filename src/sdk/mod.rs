//! Chain-abstraction SDK seam.
//!
//! The SDK owns all chain interaction: balance aggregation, allowance
//! transactions, intents. This crate only drives it through
//! [`ChainAbstraction`]; outcomes of allowance and intent requests arrive
//! asynchronously through the registered hooks, not through return values.

mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::wallet::WalletProvider;

pub use types::{
    AllowanceRequest, BridgeRequest, HookCallback, HookPayload, InitOptions, RpcRequest,
    TransferRequest,
};

/// Errors reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("Request was rejected by the user")]
    UserRejected,

    #[error("{operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

impl SdkError {
    pub fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        SdkError::Failed {
            operation,
            message: message.into(),
        }
    }
}

/// The external chain-abstraction SDK.
///
/// Implementations must replace, not stack, hooks on repeated registration.
#[async_trait]
pub trait ChainAbstraction: Send + Sync {
    /// Binds the wallet provider the SDK signs and queries through.
    /// Must happen before `init`.
    fn set_evm_provider(&self, provider: Arc<dyn WalletProvider>);

    /// Resolves once the SDK is ready for the given chains and network.
    async fn init(&self, options: InitOptions) -> Result<(), SdkError>;

    fn set_on_allowance_hook(&self, hook: HookCallback);

    fn set_on_intent_hook(&self, hook: HookCallback);

    /// Aggregated balances. The shape varies by SDK revision.
    async fn get_unified_balances(&self, account: Option<String>) -> Result<Value, SdkError>;

    async fn allowance(&self, request: AllowanceRequest) -> Result<(), SdkError>;

    async fn transfer(&self, request: TransferRequest) -> Result<(), SdkError>;

    async fn bridge(&self, request: BridgeRequest) -> Result<(), SdkError>;

    async fn request(&self, request: RpcRequest) -> Result<Value, SdkError>;
}
