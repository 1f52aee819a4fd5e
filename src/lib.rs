//! Wallet, SDK session and allowance coordination for a chain-abstraction
//! sample app.

pub mod allowance;
pub mod balance;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod sdk;
pub mod session;
pub mod sim;
pub mod ui;
pub mod wallet;

pub use error::AppError;
