//! Model-View-Intent (MVI) primitives.
//!
//! Every state machine in the coordinator (connection, session, popups) is
//! a pure reducer over an immutable state value.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ ViewModel
//!    ↑                                 │
//!    └─────── user action / SDK event ─┘
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
