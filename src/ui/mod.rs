//! UI State Coordinator.
//!
//! [`App`] sequences the wallet adapter, the SDK session, the hook registry,
//! the balance fetcher and the allowance orchestrator. Rendering is limited
//! to a derived [`ViewModel`] with a plain-text renderer.

pub mod app;
pub mod connection;
pub mod events;
pub mod mvi;
pub mod popups;
pub mod view;

pub use app::App;
pub use events::{AppEvent, EventHandler, EventSender, TaskKind};
pub use view::{MainView, ViewModel};
