//! Application configuration: chain registry, token table, allowance and display settings.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{AllowanceConfig, ChainConfig, Config, DisplayConfig, SessionConfig};
