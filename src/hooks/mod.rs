//! Event Hook Registry.
//!
//! Turns the SDK's `{status, data}` hook callbacks into a closed set of
//! typed observations. Unknown statuses are kept as `Other` instead of
//! being dropped, and only the latest observation of each kind is retained.

mod status;

use std::sync::Arc;

use crate::sdk::{ChainAbstraction, HookPayload};

pub use status::{classify, AllowanceOutcome, HookKind, IntentLifecycle, StatusEvent, StatusSlots};

/// Tracks the single hook registration of the current session.
///
/// Hooks are tagged with the epoch they were registered for, so callbacks
/// from an earlier session can be recognised and discarded downstream.
#[derive(Debug, Default)]
pub struct HookRegistry {
    registered_epoch: Option<u64>,
    registrations: u64,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one handler per hook kind for `epoch`.
    ///
    /// Returns `false` without touching the SDK when hooks are already
    /// registered for this epoch. Registering for a new epoch replaces the
    /// SDK's previous handlers.
    pub fn register<F>(&mut self, sdk: &dyn ChainAbstraction, epoch: u64, forward: F) -> bool
    where
        F: Fn(u64, HookKind, HookPayload) + Send + Sync + 'static,
    {
        if self.registered_epoch == Some(epoch) {
            return false;
        }

        let forward = Arc::new(forward);
        let on_allowance = Arc::clone(&forward);
        sdk.set_on_allowance_hook(Arc::new(move |payload| {
            on_allowance(epoch, HookKind::Allowance, payload)
        }));
        sdk.set_on_intent_hook(Arc::new(move |payload| {
            forward(epoch, HookKind::Intent, payload)
        }));

        self.registered_epoch = Some(epoch);
        self.registrations += 1;
        tracing::debug!(epoch, "SDK hooks registered");
        true
    }

    /// Forgets the current registration. The next `register` call installs
    /// fresh handlers.
    pub fn detach(&mut self) {
        self.registered_epoch = None;
    }

    pub fn registered_epoch(&self) -> Option<u64> {
        self.registered_epoch
    }

    /// Total number of registrations performed.
    pub fn registrations(&self) -> u64 {
        self.registrations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedSdk;
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn register_is_idempotent_per_epoch() {
        let sdk = SimulatedSdk::new();
        let mut registry = HookRegistry::new();

        assert!(registry.register(&sdk, 1, |_, _, _| {}));
        assert!(!registry.register(&sdk, 1, |_, _, _| {}));
        assert_eq!(registry.registrations(), 1);
        assert_eq!(sdk.hook_registrations(), 1);
    }

    #[test]
    fn new_epoch_replaces_handlers() {
        let sdk = SimulatedSdk::new();
        let mut registry = HookRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        registry.register(&sdk, 1, move |epoch, kind, _| sink.lock().push((epoch, kind)));
        registry.detach();
        let sink = Arc::clone(&seen);
        registry.register(&sdk, 2, move |epoch, kind, _| sink.lock().push((epoch, kind)));

        sdk.emit_allowance(HookPayload::new("success", json!({})));

        assert_eq!(*seen.lock(), vec![(2, HookKind::Allowance)]);
    }
}
