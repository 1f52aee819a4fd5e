//! Reducer for the SDK session lifecycle.

use crate::ui::mvi::Reducer;

use super::intent::SessionIntent;
use super::state::SessionState;

/// Pure transitions. Out-of-order intents leave the state unchanged;
/// [`super::SdkSession`] decides whether such a call is an error.
pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = SessionState;
    type Intent = SessionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SessionIntent::Begin => match state {
                SessionState::Uninitialized => SessionState::Initializing,
                other => other,
            },
            SessionIntent::Succeeded => match state {
                SessionState::Initializing => SessionState::Ready,
                other => other,
            },
            SessionIntent::Failed { reason } => match state {
                SessionState::Initializing => SessionState::Failed { reason },
                other => other,
            },
            SessionIntent::Reset => SessionState::Uninitialized,
        }
    }
}
