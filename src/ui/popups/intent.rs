use crate::ui::mvi::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupIntent {
    /// Opens the balance popup, selecting `first_chain` when nothing is selected yet.
    OpenBalances { first_chain: Option<u64> },
    SelectChain(u64),
    CloseBalances,
    OpenAllowance,
    CloseAllowance,
    CloseAll,
}

impl Intent for PopupIntent {}
