use crate::ui::mvi::UiState;

/// Open balance popup with the chain whose holdings are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePopup {
    pub selected_chain: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupState {
    pub balances: Option<BalancePopup>,
    pub allowance_open: bool,
}

impl UiState for PopupState {}

impl PopupState {
    pub fn balances_open(&self) -> bool {
        self.balances.is_some()
    }

    pub fn selected_chain(&self) -> Option<u64> {
        self.balances.and_then(|popup| popup.selected_chain)
    }
}
