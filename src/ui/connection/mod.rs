//! Wallet connection lifecycle (MVI).

mod intent;
mod reducer;
mod state;

pub use intent::ConnectionIntent;
pub use reducer::ConnectionReducer;
pub use state::ConnectionState;
