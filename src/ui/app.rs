use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::AbortHandle;

use crate::allowance::{AllowanceOrchestrator, AllowanceTable, AllowanceValue, BatchReport, UNLIMITED};
use crate::balance::{BalanceError, BalanceSnapshot, DecimalTable, UnifiedBalanceFetcher};
use crate::config::Config;
use crate::error::AppError;
use crate::hooks::{classify, HookKind, HookRegistry, StatusSlots};
use crate::sdk::{
    BridgeRequest, ChainAbstraction, HookPayload, InitOptions, RpcRequest, SdkError, TransferRequest,
};
use crate::session::{InitStart, SdkSession, SessionState};
use crate::ui::connection::{ConnectionIntent, ConnectionReducer, ConnectionState};
use crate::ui::events::{AppEvent, EventHandler, TaskKind};
use crate::ui::mvi::Reducer;
use crate::ui::popups::{PopupIntent, PopupReducer, PopupState};
use crate::ui::view::ViewModel;
use crate::wallet::{AccountAddress, WalletAdapter, WalletError};

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    };
}

/// The UI state coordinator.
///
/// Sole owner of the connection and session states. User actions are plain
/// method calls; anything that talks to the wallet or the SDK runs on a
/// spawned task and reports back through [`AppEvent`]s, which are applied
/// by [`App::handle_event`] only if they belong to the current epoch.
pub struct App {
    config: Config,
    wallet: WalletAdapter,
    session: SdkSession,
    hooks: HookRegistry,
    status: StatusSlots,
    fetcher: UnifiedBalanceFetcher,
    orchestrator: AllowanceOrchestrator,
    allowances: AllowanceTable,
    /// Connection lifecycle (MVI pattern).
    connection: ConnectionState,
    /// Popup visibility (MVI pattern).
    popups: PopupState,
    snapshot: Option<BalanceSnapshot>,
    last_rpc: Option<(String, Value)>,
    last_error: Option<AppError>,
    loading_balances: bool,
    submitting_allowances: bool,
    /// Bumped on every disconnect. Events from older epochs are dropped.
    epoch: u64,
    /// Spawned tasks of the current epoch whose result has not been handled.
    pending: usize,
    /// Abort handles of spawned calls; aborted on disconnect.
    in_flight: Vec<AbortHandle>,
    events: EventHandler,
}

impl App {
    pub fn new(config: Config, wallet: WalletAdapter, sdk: Arc<dyn ChainAbstraction>) -> Self {
        let fetcher = UnifiedBalanceFetcher::new(DecimalTable::from_config(&config.display));
        let orchestrator =
            AllowanceOrchestrator::new(config.chains.clone(), config.allowance.clone());
        let allowances = AllowanceTable::new(&config.chain_ids());
        Self {
            config,
            wallet,
            session: SdkSession::create(sdk),
            hooks: HookRegistry::new(),
            status: StatusSlots::default(),
            fetcher,
            orchestrator,
            allowances,
            connection: ConnectionState::default(),
            popups: PopupState::default(),
            snapshot: None,
            last_rpc: None,
            last_error: None,
            loading_balances: false,
            submitting_allowances: false,
            epoch: 0,
            pending: 0,
            in_flight: Vec::new(),
            events: EventHandler::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn account(&self) -> Option<&AccountAddress> {
        self.connection.account()
    }

    pub fn snapshot(&self) -> Option<&BalanceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> &StatusSlots {
        &self.status
    }

    pub fn allowances(&self) -> &AllowanceTable {
        &self.allowances
    }

    pub fn popups(&self) -> &PopupState {
        &self.popups
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Method and result of the latest successful raw request.
    pub fn last_rpc(&self) -> Option<(&str, &Value)> {
        self.last_rpc.as_ref().map(|(method, value)| (method.as_str(), value))
    }

    pub fn is_loading_balances(&self) -> bool {
        self.loading_balances
    }

    pub fn is_submitting_allowances(&self) -> bool {
        self.submitting_allowances
    }

    pub fn wallet_detected(&self) -> bool {
        self.wallet.detect()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn hook_registrations(&self) -> u64 {
        self.hooks.registrations()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from_app(self)
    }

    /// Asks the wallet for accounts, then initializes the SDK session.
    ///
    /// A no-op while connecting or connected.
    pub fn connect(&mut self) -> Result<(), AppError> {
        if self.connection != ConnectionState::Disconnected {
            tracing::debug!(state = ?self.connection, "Connect ignored");
            return Ok(());
        }
        if !self.wallet.detect() {
            return Err(self.fail(AppError::NoProvider));
        }

        dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Request);
        let wallet = self.wallet.clone();
        let epoch = self.epoch;
        self.spawn(TaskKind::Accounts, async move {
            AppEvent::AccountsResolved {
                epoch,
                interactive: true,
                result: wallet.request_accounts().await,
            }
        });
        Ok(())
    }

    /// Reconnects silently when the wallet already authorized an account.
    ///
    /// No prompt is shown and an empty account list is not an error.
    pub fn restore(&mut self) {
        if self.connection != ConnectionState::Disconnected || !self.wallet.detect() {
            return;
        }

        dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Request);
        let wallet = self.wallet.clone();
        let epoch = self.epoch;
        self.spawn(TaskKind::Accounts, async move {
            AppEvent::AccountsResolved {
                epoch,
                interactive: false,
                result: wallet.query_accounts().await,
            }
        });
    }

    /// Returns to `Disconnected × Uninitialized` from any state.
    ///
    /// In-flight calls are aborted at their next await point, and results
    /// of calls started before this point are discarded when they arrive.
    pub fn disconnect(&mut self) {
        self.epoch += 1;
        self.abort_in_flight();
        dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Disconnect);
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::CloseAll);
        self.session.reset();
        self.hooks.detach();
        self.status.clear();
        self.allowances.reset();
        self.snapshot = None;
        self.last_rpc = None;
        self.last_error = None;
        self.loading_balances = false;
        self.submitting_allowances = false;
        tracing::info!(epoch = self.epoch, "Disconnected");
    }

    /// Fetches unified balances and opens the balance popup.
    pub fn show_balances(&mut self) -> Result<(), AppError> {
        let (sdk, account) = self.ready()?;
        self.spawn_balance_fetch(sdk, account, true);
        Ok(())
    }

    pub fn select_chain(&mut self, chain_id: u64) {
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::SelectChain(chain_id));
    }

    pub fn close_balances(&mut self) {
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::CloseBalances);
    }

    /// Opens the allowance dialog.
    pub fn set_allowance(&mut self) -> Result<(), AppError> {
        self.ready()?;
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::OpenAllowance);
        Ok(())
    }

    /// Replaces one chain's entry with a validated value.
    pub fn edit_allowance(&mut self, chain_id: u64, input: &str) -> Result<(), AppError> {
        let stored = match AllowanceValue::parse(input) {
            Ok(AllowanceValue::Unlimited) => UNLIMITED.to_string(),
            Ok(AllowanceValue::Amount(amount)) => amount.to_string(),
            Err(err) => return Err(self.fail(err.into())),
        };
        if let Err(err) = self.allowances.set(chain_id, stored) {
            return Err(self.fail(err.into()));
        }
        Ok(())
    }

    pub fn set_all_unlimited(&mut self) {
        self.allowances.reset();
    }

    /// Sets every chain to the same non-zero amount.
    pub fn set_all_amount(&mut self, input: &str) -> Result<(), AppError> {
        let amount =
            AllowanceValue::parse_positive_amount(input).map_err(|err| self.fail(err.into()))?;
        self.allowances.set_all(&amount.to_string());
        Ok(())
    }

    pub fn clear_all_allowances(&mut self) {
        self.allowances.clear_all();
    }

    /// Hides the dialog and discards its edits.
    pub fn close_allowance_dialog(&mut self) {
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::CloseAllowance);
        self.allowances.reset();
    }

    /// Submits the current table, one request per supported chain.
    ///
    /// Per-chain outcomes arrive through the allowance hook; the dialog
    /// closes once every chain has been attempted.
    pub fn submit_allowances(&mut self) -> Result<(), AppError> {
        let (sdk, _) = self.ready()?;
        if self.submitting_allowances {
            tracing::debug!("Allowance batch already in flight");
            return Ok(());
        }

        self.submitting_allowances = true;
        let orchestrator = self.orchestrator.clone();
        let table = self.allowances.clone();
        let epoch = self.epoch;
        self.spawn(TaskKind::Allowances, async move {
            AppEvent::AllowanceBatchFinished {
                epoch,
                report: orchestrator.submit(sdk, &table).await,
            }
        });
        Ok(())
    }

    pub fn transfer(&mut self, request: TransferRequest) -> Result<(), AppError> {
        let (sdk, _) = self.ready()?;
        let epoch = self.epoch;
        self.spawn(TaskKind::Transfer, async move {
            AppEvent::IntentSubmitted {
                epoch,
                operation: "transfer",
                result: sdk.transfer(request).await,
            }
        });
        Ok(())
    }

    pub fn bridge(&mut self, request: BridgeRequest) -> Result<(), AppError> {
        let (sdk, _) = self.ready()?;
        let epoch = self.epoch;
        self.spawn(TaskKind::Bridge, async move {
            AppEvent::IntentSubmitted {
                epoch,
                operation: "bridge",
                result: sdk.bridge(request).await,
            }
        });
        Ok(())
    }

    /// Raw JSON-RPC pass-through to the SDK's provider.
    pub fn request(&mut self, request: RpcRequest) -> Result<(), AppError> {
        let (sdk, _) = self.ready()?;
        let epoch = self.epoch;
        self.spawn(TaskKind::Request, async move {
            let method = request.method.clone();
            AppEvent::RpcResponse {
                epoch,
                method,
                result: sdk.request(request).await,
            }
        });
        Ok(())
    }

    /// Applies one event, unless it belongs to an earlier epoch.
    ///
    /// Stale task results do not count against `pending`, which was reset
    /// when their epoch ended.
    pub fn handle_event(&mut self, event: AppEvent) {
        if event.epoch() != self.epoch {
            tracing::debug!(
                event_epoch = event.epoch(),
                current = self.epoch,
                "Discarding stale event"
            );
            return;
        }
        if event.is_task_result() {
            self.pending = self.pending.saturating_sub(1);
        }

        match event {
            AppEvent::AccountsResolved {
                interactive,
                result,
                ..
            } => self.on_accounts(interactive, result),
            AppEvent::SessionInitialized { result, .. } => self.on_session_initialized(result),
            AppEvent::BalancesFetched {
                open_popup, result, ..
            } => self.on_balances(open_popup, result),
            AppEvent::AllowanceBatchFinished { report, .. } => self.on_allowance_batch(report),
            AppEvent::IntentSubmitted {
                operation, result, ..
            } => match result {
                Ok(()) => self.last_error = None,
                Err(err) => {
                    self.fail(AppError::intent(operation, err));
                }
            },
            AppEvent::RpcResponse { method, result, .. } => match result {
                Ok(value) => {
                    self.last_rpc = Some((method, value));
                    self.last_error = None;
                }
                Err(err) => {
                    self.fail(AppError::intent("request", err));
                }
            },
            AppEvent::TaskFailed { kind, message, .. } => self.on_task_failed(kind, message),
            AppEvent::Hook { kind, payload, .. } => self.on_hook(kind, payload),
        }
    }

    /// Waits for the next event without applying it.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events.next().await
    }

    /// Handles events until no spawned task is outstanding, then drains
    /// hook events that are already queued.
    pub async fn run_until_idle(&mut self) {
        while self.pending > 0 {
            match self.events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
        while let Some(event) = self.events.try_next() {
            self.handle_event(event);
        }
    }

    /// Aborts in-flight calls and disposes the SDK session, detaching its hooks.
    pub fn shutdown(mut self) {
        tracing::info!("Shutting down");
        self.abort_in_flight();
        self.session.dispose();
    }

    fn on_accounts(&mut self, interactive: bool, result: Result<Vec<String>, WalletError>) {
        if !self.connection.is_connecting() {
            tracing::debug!("Accounts resolved while not connecting; ignoring");
            return;
        }

        let accounts = match result {
            Ok(accounts) => accounts,
            Err(err) => return self.fail_connect(err.into()),
        };
        let Some(first) = accounts.first() else {
            if interactive {
                return self.fail_connect(AppError::NoAccounts);
            }
            tracing::debug!("No authorized accounts to restore");
            dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Failed);
            return;
        };
        let account = match AccountAddress::parse(first) {
            Ok(account) => account,
            Err(err) => return self.fail_connect(err.into()),
        };

        dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Resolved(account));
        tracing::info!(%account, "Wallet connected");
        self.last_error = None;
        self.start_session();
    }

    fn start_session(&mut self) {
        let Some(provider) = self.wallet.provider() else {
            return self.fail_connect(AppError::NoProvider);
        };
        match self.session.begin_initialize(provider) {
            Ok(InitStart::Started) => {
                let options = InitOptions {
                    chain_ids: self.config.chain_ids(),
                    network: self.config.session.network.clone(),
                };
                let init = self.session.init_call(options);
                let epoch = self.epoch;
                self.spawn(TaskKind::SessionInit, async move {
                    AppEvent::SessionInitialized {
                        epoch,
                        result: init.await,
                    }
                });
            }
            Ok(InitStart::AlreadyReady) => self.on_session_ready(),
            Err(err) => self.fail_connect(err.into()),
        }
    }

    fn on_session_initialized(&mut self, result: Result<(), SdkError>) {
        if !self.session.state().is_initializing() {
            tracing::debug!("Init result arrived outside initialization; ignoring");
            return;
        }
        match self.session.complete_initialize(result) {
            Ok(()) => self.on_session_ready(),
            Err(err) => self.fail_connect(err.into()),
        }
    }

    /// Registers hooks for this epoch and starts the first balance fetch.
    fn on_session_ready(&mut self) {
        let (sdk, account) = match self.ready() {
            Ok(ready) => ready,
            Err(_) => return,
        };

        let sender = self.events.sender();
        self.hooks.register(sdk.as_ref(), self.epoch, move |epoch, kind, payload| {
            // Closed only once the app is dropped.
            let _ = sender.send(AppEvent::Hook {
                epoch,
                kind,
                payload,
            });
        });
        self.last_error = None;
        self.spawn_balance_fetch(sdk, account, false);
    }

    fn on_balances(&mut self, open_popup: bool, result: Result<BalanceSnapshot, BalanceError>) {
        self.loading_balances = false;
        let Some(account) = self.connection.account().copied() else {
            return;
        };

        match result {
            Ok(snapshot) if snapshot.account == account => {
                if open_popup {
                    let first_chain = snapshot.chain_ids().first().copied();
                    dispatch_mvi!(self, popups, PopupReducer, PopupIntent::OpenBalances { first_chain });
                }
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Ok(snapshot) => {
                tracing::debug!(fetched_for = %snapshot.account, "Discarding balances for another account");
            }
            Err(err) => {
                self.snapshot = None;
                self.fail(err.into());
            }
        }
    }

    /// Closes the dialog once every chain was attempted.
    ///
    /// The allowance status slot is left to the SDK's allowance hook; only
    /// the current error is taken from the batch.
    fn on_allowance_batch(&mut self, report: BatchReport) {
        self.submitting_allowances = false;
        dispatch_mvi!(self, popups, PopupReducer, PopupIntent::CloseAllowance);
        self.allowances.reset();

        match report.failed.last() {
            Some(err) => {
                self.fail(err.clone().into());
            }
            None => self.last_error = None,
        }
    }

    fn on_task_failed(&mut self, kind: TaskKind, message: String) {
        let err = AppError::TaskFailed {
            task: kind.label(),
            message,
        };
        match kind {
            TaskKind::Accounts | TaskKind::SessionInit => self.fail_connect(err),
            TaskKind::Balances => {
                self.loading_balances = false;
                self.fail(err);
            }
            TaskKind::Allowances => {
                self.submitting_allowances = false;
                self.fail(err);
            }
            TaskKind::Transfer | TaskKind::Bridge | TaskKind::Request => {
                self.fail(err);
            }
        }
    }

    fn on_hook(&mut self, kind: HookKind, payload: HookPayload) {
        let event = classify(kind, &payload);
        tracing::debug!(?event, "SDK hook");
        self.status.record(event);
    }

    /// The SDK and account, only while `Connected × Ready`.
    fn ready(&mut self) -> Result<(Arc<dyn ChainAbstraction>, AccountAddress), AppError> {
        let Some(account) = self.connection.account().copied() else {
            return Err(self.fail(AppError::NotConnected));
        };
        let sdk = self.session.ready_sdk().map_err(|err| self.fail(err.into()))?;
        Ok((sdk, account))
    }

    fn spawn_balance_fetch(
        &mut self,
        sdk: Arc<dyn ChainAbstraction>,
        account: AccountAddress,
        open_popup: bool,
    ) {
        self.loading_balances = true;
        let fetcher = self.fetcher.clone();
        let epoch = self.epoch;
        self.spawn(TaskKind::Balances, async move {
            AppEvent::BalancesFetched {
                epoch,
                open_popup,
                result: fetcher.fetch(sdk, account).await,
            }
        });
    }

    /// Runs `task` on the runtime and forwards its event.
    ///
    /// A panic in `task` is forwarded as [`AppEvent::TaskFailed`], so every
    /// spawned call produces exactly one task result.
    fn spawn<F>(&mut self, kind: TaskKind, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.pending += 1;
        self.in_flight.retain(|handle| !handle.is_finished());

        let epoch = self.epoch;
        let sender = self.events.sender();
        let handle = tokio::spawn(task);
        self.in_flight.push(handle.abort_handle());
        tokio::spawn(async move {
            let event = match handle.await {
                Ok(event) => event,
                Err(err) => AppEvent::TaskFailed {
                    epoch,
                    kind,
                    message: err.to_string(),
                },
            };
            let _ = sender.send(event);
        });
    }

    /// Stops every spawned call; `pending` restarts from zero for the next epoch.
    fn abort_in_flight(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
        self.pending = 0;
    }

    /// Reverts a failed connect to `Disconnected × Uninitialized`.
    fn fail_connect(&mut self, err: AppError) {
        dispatch_mvi!(self, connection, ConnectionReducer, ConnectionIntent::Failed);
        self.session.reset();
        self.hooks.detach();
        self.fail(err);
    }

    /// Records `err` as the current error and hands it back.
    fn fail(&mut self, err: AppError) -> AppError {
        tracing::warn!(error = %err, "Operation failed");
        self.last_error = Some(err.clone());
        err
    }
}
