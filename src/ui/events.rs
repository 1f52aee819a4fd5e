use serde_json::Value;
use tokio::sync::mpsc;

use crate::allowance::BatchReport;
use crate::balance::{BalanceError, BalanceSnapshot};
use crate::hooks::HookKind;
use crate::sdk::{HookPayload, SdkError};
use crate::wallet::WalletError;

/// Which spawned call a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Accounts,
    SessionInit,
    Balances,
    Allowances,
    Transfer,
    Bridge,
    Request,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Accounts => "account request",
            Self::SessionInit => "session init",
            Self::Balances => "balance fetch",
            Self::Allowances => "allowance batch",
            Self::Transfer => "transfer",
            Self::Bridge => "bridge",
            Self::Request => "request",
        }
    }
}

/// Results of spawned wallet/SDK calls and forwarded SDK hooks.
///
/// Every variant carries the coordinator epoch it was started under, so
/// results from before a `disconnect()` can be told apart and dropped.
#[derive(Debug)]
pub enum AppEvent {
    /// `eth_requestAccounts` (interactive) or `eth_accounts` finished.
    AccountsResolved {
        epoch: u64,
        interactive: bool,
        result: Result<Vec<String>, WalletError>,
    },
    SessionInitialized {
        epoch: u64,
        result: Result<(), SdkError>,
    },
    BalancesFetched {
        epoch: u64,
        /// Open the balance popup on success.
        open_popup: bool,
        result: Result<BalanceSnapshot, BalanceError>,
    },
    AllowanceBatchFinished {
        epoch: u64,
        report: BatchReport,
    },
    /// `transfer` or `bridge` returned.
    IntentSubmitted {
        epoch: u64,
        operation: &'static str,
        result: Result<(), SdkError>,
    },
    RpcResponse {
        epoch: u64,
        method: String,
        result: Result<Value, SdkError>,
    },
    /// A spawned call panicked or was aborted before producing its result.
    TaskFailed {
        epoch: u64,
        kind: TaskKind,
        message: String,
    },
    /// SDK hook callback, tagged with the epoch it was registered for.
    Hook {
        epoch: u64,
        kind: HookKind,
        payload: HookPayload,
    },
}

impl AppEvent {
    pub fn epoch(&self) -> u64 {
        match self {
            Self::AccountsResolved { epoch, .. }
            | Self::SessionInitialized { epoch, .. }
            | Self::BalancesFetched { epoch, .. }
            | Self::AllowanceBatchFinished { epoch, .. }
            | Self::IntentSubmitted { epoch, .. }
            | Self::RpcResponse { epoch, .. }
            | Self::TaskFailed { epoch, .. }
            | Self::Hook { epoch, .. } => *epoch,
        }
    }

    /// Hook events are not produced by a spawned task.
    pub fn is_task_result(&self) -> bool {
        !matches!(self, Self::Hook { .. })
    }
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;

/// Single-consumer queue feeding the coordinator.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: EventSender,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Waits for the next event. Never returns `None` while `self` holds a sender.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Next already-queued event, without waiting.
    pub fn try_next(&mut self) -> Option<AppEvent> {
        self.rx.try_recv().ok()
    }
}
