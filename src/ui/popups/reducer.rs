use crate::ui::mvi::Reducer;
use crate::ui::popups::intent::PopupIntent;
use crate::ui::popups::state::{BalancePopup, PopupState};

pub struct PopupReducer;

impl Reducer for PopupReducer {
    type State = PopupState;
    type Intent = PopupIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PopupIntent::OpenBalances { first_chain } => {
                let selected_chain = state.selected_chain().or(first_chain);
                PopupState {
                    balances: Some(BalancePopup { selected_chain }),
                    ..state
                }
            }
            PopupIntent::SelectChain(chain_id) => match state.balances {
                Some(_) => PopupState {
                    balances: Some(BalancePopup {
                        selected_chain: Some(chain_id),
                    }),
                    ..state
                },
                None => state,
            },
            PopupIntent::CloseBalances => PopupState {
                balances: None,
                ..state
            },
            PopupIntent::OpenAllowance => PopupState {
                allowance_open: true,
                ..state
            },
            PopupIntent::CloseAllowance => PopupState {
                allowance_open: false,
                ..state
            },
            PopupIntent::CloseAll => PopupState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(first_chain: Option<u64>) -> PopupState {
        PopupReducer::reduce(PopupState::default(), PopupIntent::OpenBalances { first_chain })
    }

    #[test]
    fn open_balances_selects_first_chain() {
        assert_eq!(open(Some(1)).selected_chain(), Some(1));
        assert_eq!(open(None).selected_chain(), None);
    }

    #[test]
    fn reopening_keeps_selection() {
        let state = PopupReducer::reduce(open(Some(1)), PopupIntent::SelectChain(8453));
        let state = PopupReducer::reduce(state, PopupIntent::OpenBalances { first_chain: Some(1) });
        assert_eq!(state.selected_chain(), Some(8453));
    }

    #[test]
    fn select_chain_requires_open_popup() {
        let state = PopupReducer::reduce(PopupState::default(), PopupIntent::SelectChain(10));
        assert!(!state.balances_open());
    }

    #[test]
    fn dialogs_are_independent_until_close_all() {
        let state = PopupReducer::reduce(open(Some(1)), PopupIntent::OpenAllowance);
        let state = PopupReducer::reduce(state, PopupIntent::CloseBalances);
        assert!(state.allowance_open);
        assert!(!state.balances_open());

        let state = PopupReducer::reduce(state, PopupIntent::CloseAll);
        assert_eq!(state, PopupState::default());
    }
}
