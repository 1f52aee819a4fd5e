//! SDK Session Manager.
//!
//! Owns one SDK client and its initialization lifecycle.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Lifecycle state enum (Uninitialized → Initializing → Ready | Failed)
//! - `intent.rs` - Lifecycle events (Begin, Succeeded, Failed, Reset)
//! - `reducer.rs` - State transitions (pure, no side effects)
//!
//! [`SdkSession`] wraps the reducer with the rules the reducer cannot express:
//! overlapping `initialize` calls are rejected, and nothing reaches the SDK
//! unless the session is `Ready`.

mod intent;
mod reducer;
mod state;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::sdk::{ChainAbstraction, HookCallback, InitOptions, SdkError};
use crate::ui::mvi::Reducer;
use crate::wallet::WalletProvider;

pub use intent::SessionIntent;
pub use reducer::SessionReducer;
pub use state::SessionState;

/// Errors from the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("CA SDK not initialized (session is {state})")]
    NotReady { state: &'static str },

    #[error("CA SDK initialization already in progress")]
    AlreadyInitializing,

    #[error("Failed to initialize CA SDK: {reason}")]
    InitFailed { reason: String },

    #[error("CA SDK session failed ({reason}); reset before retrying")]
    NeedsReset { reason: String },
}

/// Outcome of starting initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStart {
    /// Moved to `Initializing`; the caller must run `init` and report back.
    Started,
    /// Already `Ready`; nothing to do.
    AlreadyReady,
}

/// An explicitly owned SDK session.
pub struct SdkSession {
    sdk: Arc<dyn ChainAbstraction>,
    state: SessionState,
}

impl SdkSession {
    pub fn create(sdk: Arc<dyn ChainAbstraction>) -> Self {
        Self {
            sdk,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// First half of initialization: validates, binds the wallet provider
    /// to the SDK and moves to `Initializing`.
    pub fn begin_initialize(
        &mut self,
        provider: Arc<dyn WalletProvider>,
    ) -> Result<InitStart, SessionError> {
        match &self.state {
            SessionState::Uninitialized => {
                self.sdk.set_evm_provider(provider);
                self.dispatch(SessionIntent::Begin);
                tracing::info!("SDK session initializing");
                Ok(InitStart::Started)
            }
            SessionState::Initializing => Err(SessionError::AlreadyInitializing),
            SessionState::Ready => Ok(InitStart::AlreadyReady),
            SessionState::Failed { reason } => Err(SessionError::NeedsReset {
                reason: reason.clone(),
            }),
        }
    }

    /// The `init` call, detached from `self` so it can run on another task.
    pub fn init_call(
        &self,
        options: InitOptions,
    ) -> impl Future<Output = Result<(), SdkError>> + Send + 'static {
        let sdk = Arc::clone(&self.sdk);
        async move { sdk.init(options).await }
    }

    /// Second half of initialization: records the `init` outcome.
    ///
    /// A result arriving when the session is no longer `Initializing`
    /// (it was reset meanwhile) is ignored.
    pub fn complete_initialize(&mut self, result: Result<(), SdkError>) -> Result<(), SessionError> {
        if !self.state.is_initializing() {
            tracing::debug!(state = self.state.label(), "Ignoring late init result");
            return Ok(());
        }

        match result {
            Ok(()) => {
                self.dispatch(SessionIntent::Succeeded);
                tracing::info!("SDK session ready");
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.dispatch(SessionIntent::Failed {
                    reason: reason.clone(),
                });
                tracing::warn!(%reason, "SDK session failed to initialize");
                Err(SessionError::InitFailed { reason })
            }
        }
    }

    /// Runs both halves inline.
    pub async fn initialize(
        &mut self,
        provider: Arc<dyn WalletProvider>,
        options: InitOptions,
    ) -> Result<InitStart, SessionError> {
        if self.begin_initialize(provider)? == InitStart::AlreadyReady {
            return Ok(InitStart::AlreadyReady);
        }
        let result = self.init_call(options).await;
        self.complete_initialize(result)?;
        Ok(InitStart::Started)
    }

    /// Returns to `Uninitialized`.
    pub fn reset(&mut self) {
        if self.state != SessionState::Uninitialized {
            tracing::info!(from = self.state.label(), "SDK session reset");
        }
        self.dispatch(SessionIntent::Reset);
    }

    /// The SDK client, only while `Ready`.
    pub fn ready_sdk(&self) -> Result<Arc<dyn ChainAbstraction>, SessionError> {
        if !self.state.is_ready() {
            return Err(SessionError::NotReady {
                state: self.state.label(),
            });
        }
        Ok(Arc::clone(&self.sdk))
    }

    /// Tears the session down and detaches any hooks left on the SDK.
    pub fn dispose(mut self) {
        let noop: HookCallback = Arc::new(|_| {});
        self.sdk.set_on_allowance_hook(Arc::clone(&noop));
        self.sdk.set_on_intent_hook(noop);
        self.reset();
    }

    fn dispatch(&mut self, intent: SessionIntent) {
        self.state = SessionReducer::reduce(std::mem::take(&mut self.state), intent);
    }
}
