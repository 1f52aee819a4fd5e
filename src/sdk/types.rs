use std::sync::Arc;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options passed to `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    pub chain_ids: Vec<u64>,
    /// Named deployment (e.g., "coral").
    pub network: String,
}

/// Raw `{status, data}` object delivered to a hook callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookPayload {
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

impl HookPayload {
    pub fn new(status: impl Into<String>, data: Value) -> Self {
        Self {
            status: status.into(),
            data,
        }
    }
}

/// Hook callback registered with the SDK. The SDK keeps one per kind.
pub type HookCallback = Arc<dyn Fn(HookPayload) + Send + Sync>;

/// Sets a spending allowance for `spender` on `token_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceRequest {
    pub token_address: Address,
    pub spender: Address,
    /// Amount in the token's base unit.
    pub amount: U256,
    pub chain_id: u64,
}

/// Sends `amount` base units of a token to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub token_address: Address,
    pub to: Address,
    pub amount: U256,
    pub chain_id: u64,
}

/// Moves unified balance of `token` onto `chain_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    /// Asset symbol (e.g., "USDC").
    pub token: String,
    pub amount: U256,
    pub chain_id: u64,
}

/// Pass-through provider request routed via the SDK.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    pub params: Value,
}
