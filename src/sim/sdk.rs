use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::keccak256;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::sdk::{
    AllowanceRequest, BridgeRequest, ChainAbstraction, HookCallback, HookPayload, InitOptions,
    RpcRequest, SdkError, TransferRequest,
};
use crate::wallet::WalletProvider;

/// In-memory SDK.
///
/// Allowances settle immediately and report success or error through the
/// allowance hook;
/// transfers and bridges walk the intent hook through
/// created → processing → processed → completed. `init` fails unless a
/// wallet provider was bound first.
pub struct SimulatedSdk {
    state: Mutex<SimState>,
}

#[derive(Default)]
struct SimState {
    provider: Option<Arc<dyn WalletProvider>>,
    provider_bindings: u32,
    provider_bound_at_init: bool,
    init_calls: u32,
    init_options: Option<InitOptions>,
    init_failure: Option<String>,
    allowance_hook: Option<HookCallback>,
    intent_hook: Option<HookCallback>,
    hook_registrations: u32,
    balances: Value,
    balance_failure: Option<String>,
    allowance_failures: HashMap<u64, String>,
    allowance_requests: Vec<AllowanceRequest>,
    transfers: Vec<TransferRequest>,
    bridges: Vec<BridgeRequest>,
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                balances: default_balances(),
                ..SimState::default()
            }),
        }
    }

    /// Replaces the response returned by `get_unified_balances`.
    pub fn set_balances(&self, balances: Value) {
        self.state.lock().balances = balances;
    }

    pub fn fail_init(&self, message: &str) {
        self.state.lock().init_failure = Some(message.to_string());
    }

    pub fn clear_init_failure(&self) {
        self.state.lock().init_failure = None;
    }

    pub fn fail_balances(&self, message: &str) {
        self.state.lock().balance_failure = Some(message.to_string());
    }

    pub fn clear_balance_failure(&self) {
        self.state.lock().balance_failure = None;
    }

    pub fn fail_allowance_on(&self, chain_id: u64, message: &str) {
        self.state
            .lock()
            .allowance_failures
            .insert(chain_id, message.to_string());
    }

    /// Number of `set_evm_provider` calls.
    pub fn provider_bindings(&self) -> u32 {
        self.state.lock().provider_bindings
    }

    /// Whether the latest `init` saw a bound provider.
    pub fn provider_bound_before_init(&self) -> bool {
        self.state.lock().provider_bound_at_init
    }

    pub fn init_calls(&self) -> u32 {
        self.state.lock().init_calls
    }

    pub fn init_options(&self) -> Option<InitOptions> {
        self.state.lock().init_options.clone()
    }

    /// Number of times the allowance hook was (re)installed.
    pub fn hook_registrations(&self) -> u32 {
        self.state.lock().hook_registrations
    }

    /// Every allowance request received, including failed ones.
    pub fn allowance_requests(&self) -> Vec<AllowanceRequest> {
        self.state.lock().allowance_requests.clone()
    }

    pub fn transfers(&self) -> Vec<TransferRequest> {
        self.state.lock().transfers.clone()
    }

    pub fn bridges(&self) -> Vec<BridgeRequest> {
        self.state.lock().bridges.clone()
    }

    /// Invokes the current allowance hook, if any.
    pub fn emit_allowance(&self, payload: HookPayload) {
        let hook = self.state.lock().allowance_hook.clone();
        if let Some(hook) = hook {
            hook(payload);
        }
    }

    /// Invokes the current intent hook, if any.
    pub fn emit_intent(&self, payload: HookPayload) {
        let hook = self.state.lock().intent_hook.clone();
        if let Some(hook) = hook {
            hook(payload);
        }
    }

    fn run_intent(&self) {
        let intent_id = Uuid::new_v4().to_string();
        for status in ["created", "processing", "processed"] {
            self.emit_intent(HookPayload::new(status, json!({ "intentId": intent_id })));
        }
        self.emit_intent(HookPayload::new(
            "completed",
            json!({ "intentId": intent_id, "transactionHash": fake_tx_hash() }),
        ));
    }
}

fn fake_tx_hash() -> String {
    keccak256(Uuid::new_v4().as_bytes()).to_string()
}

fn default_balances() -> Value {
    json!([
        {
            "symbol": "ETH",
            "balance": "0.75",
            "balanceInFiat": 2250.0,
            "decimals": 18,
            "breakdown": [
                { "chain": { "id": 1, "name": "Ethereum" }, "balance": "0.5", "balanceInFiat": 1500.0 },
                { "chain": { "id": 8453, "name": "Base" }, "balance": "0.25", "balanceInFiat": 750.0 }
            ]
        },
        {
            "symbol": "USDC",
            "balance": "120.5",
            "balanceInFiat": 120.5,
            "decimals": 6,
            "breakdown": [
                { "chain": { "id": 10, "name": "Optimism" }, "balance": "100.0", "balanceInFiat": 100.0 },
                { "chain": { "id": 42161, "name": "Arbitrum" }, "balance": "20.5", "balanceInFiat": 20.5 }
            ]
        }
    ])
}

#[async_trait]
impl ChainAbstraction for SimulatedSdk {
    fn set_evm_provider(&self, provider: Arc<dyn WalletProvider>) {
        let mut state = self.state.lock();
        state.provider = Some(provider);
        state.provider_bindings += 1;
    }

    async fn init(&self, options: InitOptions) -> Result<(), SdkError> {
        let mut state = self.state.lock();
        state.init_calls += 1;
        state.init_options = Some(options);
        state.provider_bound_at_init = state.provider.is_some();
        if !state.provider_bound_at_init {
            return Err(SdkError::failed("init", "no EVM provider set"));
        }
        match &state.init_failure {
            Some(message) => Err(SdkError::failed("init", message.clone())),
            None => Ok(()),
        }
    }

    fn set_on_allowance_hook(&self, hook: HookCallback) {
        let mut state = self.state.lock();
        state.allowance_hook = Some(hook);
        state.hook_registrations += 1;
    }

    fn set_on_intent_hook(&self, hook: HookCallback) {
        self.state.lock().intent_hook = Some(hook);
    }

    async fn get_unified_balances(&self, _account: Option<String>) -> Result<Value, SdkError> {
        let state = self.state.lock();
        match &state.balance_failure {
            Some(message) => Err(SdkError::failed("getUnifiedBalances", message.clone())),
            None => Ok(state.balances.clone()),
        }
    }

    async fn allowance(&self, request: AllowanceRequest) -> Result<(), SdkError> {
        let chain_id = request.chain_id;
        let failure = {
            let mut state = self.state.lock();
            state.allowance_requests.push(request);
            state.allowance_failures.get(&chain_id).cloned()
        };
        if let Some(message) = failure {
            self.emit_allowance(HookPayload::new(
                "error",
                json!({ "chainId": chain_id, "message": message }),
            ));
            return Err(SdkError::failed("allowance", message));
        }
        self.emit_allowance(HookPayload::new(
            "success",
            json!({ "chainId": chain_id, "transactionHash": fake_tx_hash() }),
        ));
        Ok(())
    }

    async fn transfer(&self, request: TransferRequest) -> Result<(), SdkError> {
        self.state.lock().transfers.push(request);
        self.run_intent();
        Ok(())
    }

    async fn bridge(&self, request: BridgeRequest) -> Result<(), SdkError> {
        self.state.lock().bridges.push(request);
        self.run_intent();
        Ok(())
    }

    async fn request(&self, request: RpcRequest) -> Result<Value, SdkError> {
        match request.method.as_str() {
            "eth_chainId" => Ok(json!("0x1")),
            "net_version" => Ok(json!("1")),
            other => Err(SdkError::failed(
                "request",
                format!("method '{}' is not supported", other),
            )),
        }
    }
}
