//! Shared test utilities and fake backends.

#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use ca_sample::config::Config;
use ca_sample::sdk::{
    AllowanceRequest, BridgeRequest, ChainAbstraction, HookCallback, InitOptions, RpcRequest,
    SdkError, TransferRequest,
};
use ca_sample::sim::{SimulatedSdk, SimulatedWallet};
use ca_sample::ui::App;
use ca_sample::wallet::{WalletAdapter, WalletProvider};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

pub const ACCOUNT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

/// 2^256 - 1 in decimal.
pub const U256_MAX_DECIMAL: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

pub fn wallet(accounts: &[&str]) -> WalletAdapter {
    let accounts = accounts.iter().map(|a| a.to_string()).collect();
    WalletAdapter::with_provider(Arc::new(SimulatedWallet::new(accounts)))
}

pub fn app_with(sdk: Arc<dyn ChainAbstraction>) -> App {
    App::new(Config::default(), wallet(&[ACCOUNT]), sdk)
}

/// App connected to a fresh simulated SDK, with all startup work done.
pub async fn ready_app() -> (App, Arc<SimulatedSdk>) {
    let sdk = Arc::new(SimulatedSdk::new());
    let mut app = app_with(sdk.clone());
    app.connect().expect("connect");
    app.run_until_idle().await;
    assert!(app.session_state().is_ready(), "session should be ready");
    (app, sdk)
}

/// Create a temporary config file with the given `(chain_id, name, usdc)` chains.
pub fn temp_config(chains: &[(u64, &str, Option<&str>)], scale_factor: u64) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");

    let mut content = format!(
        r#"[session]
network = "testnet"

[allowance]
scale_factor = {}

"#,
        scale_factor
    );
    for (chain_id, name, usdc) in chains {
        content.push_str(&format!(
            "[[chains]]\nchain_id = {}\nname = \"{}\"\n",
            chain_id, name
        ));
        if let Some(usdc) = usdc {
            content.push_str(&format!("usdc = \"{}\"\n", usdc));
        }
        content.push('\n');
    }

    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// SDK whose balance and allowance calls can be held on gates.
///
/// Everything else is delegated to a [`SimulatedSdk`].
pub struct GatedSdk {
    pub inner: Arc<SimulatedSdk>,
    balances_open: watch::Sender<bool>,
    allowances_open: watch::Sender<bool>,
    waiting: AtomicUsize,
    panic_on_balances: AtomicBool,
}

/// Counts a call as blocked until it passes the gate or is dropped.
struct Blocked<'a>(&'a AtomicUsize);

impl<'a> Blocked<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Blocked<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GatedSdk {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SimulatedSdk::new()),
            balances_open: watch::channel(true).0,
            allowances_open: watch::channel(true).0,
            waiting: AtomicUsize::new(0),
            panic_on_balances: AtomicBool::new(false),
        }
    }

    /// Balance queries started from now on block.
    pub fn hold(&self) {
        self.balances_open.send_replace(false);
    }

    pub fn release(&self) {
        self.balances_open.send_replace(true);
    }

    /// Allowance requests started from now on block.
    pub fn hold_allowances(&self) {
        self.allowances_open.send_replace(false);
    }

    pub fn release_allowances(&self) {
        self.allowances_open.send_replace(true);
    }

    /// Calls currently blocked on either gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Balance queries panic instead of answering.
    pub fn panic_on_balances(&self) {
        self.panic_on_balances.store(true, Ordering::SeqCst);
    }

    async fn pass(&self, gate: &watch::Sender<bool>) {
        let mut open = gate.subscribe();
        let _blocked = Blocked::enter(&self.waiting);
        let _ = open.wait_for(|open| *open).await;
    }
}

#[async_trait]
impl ChainAbstraction for GatedSdk {
    fn set_evm_provider(&self, provider: Arc<dyn WalletProvider>) {
        self.inner.set_evm_provider(provider)
    }

    async fn init(&self, options: InitOptions) -> Result<(), SdkError> {
        self.inner.init(options).await
    }

    fn set_on_allowance_hook(&self, hook: HookCallback) {
        self.inner.set_on_allowance_hook(hook)
    }

    fn set_on_intent_hook(&self, hook: HookCallback) {
        self.inner.set_on_intent_hook(hook)
    }

    async fn get_unified_balances(&self, account: Option<String>) -> Result<Value, SdkError> {
        self.pass(&self.balances_open).await;
        if self.panic_on_balances.load(Ordering::SeqCst) {
            panic!("balance indexer crashed");
        }
        self.inner.get_unified_balances(account).await
    }

    async fn allowance(&self, request: AllowanceRequest) -> Result<(), SdkError> {
        self.pass(&self.allowances_open).await;
        self.inner.allowance(request).await
    }

    async fn transfer(&self, request: TransferRequest) -> Result<(), SdkError> {
        self.inner.transfer(request).await
    }

    async fn bridge(&self, request: BridgeRequest) -> Result<(), SdkError> {
        self.inner.bridge(request).await
    }

    async fn request(&self, request: RpcRequest) -> Result<Value, SdkError> {
        self.inner.request(request).await
    }
}
