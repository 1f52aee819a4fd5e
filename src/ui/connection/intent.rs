use crate::ui::mvi::Intent;
use crate::wallet::AccountAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionIntent {
    /// User asked to connect.
    Request,
    /// The wallet returned a well-formed account.
    Resolved(AccountAddress),
    /// Account request or session init failed.
    Failed,
    Disconnect,
}

impl Intent for ConnectionIntent {}
