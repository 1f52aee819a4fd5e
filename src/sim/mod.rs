//! Deterministic in-memory wallet provider and SDK.
//!
//! Used by the command-line demo and by tests in place of a browser wallet
//! and the hosted chain-abstraction SDK.

mod sdk;
mod wallet;

pub use sdk::SimulatedSdk;
pub use wallet::SimulatedWallet;
