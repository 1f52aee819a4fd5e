use crate::ui::connection::intent::ConnectionIntent;
use crate::ui::connection::state::ConnectionState;
use crate::ui::mvi::Reducer;

pub struct ConnectionReducer;

impl Reducer for ConnectionReducer {
    type State = ConnectionState;
    type Intent = ConnectionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ConnectionIntent::Request => match state {
                ConnectionState::Disconnected => ConnectionState::Connecting,
                other => other,
            },
            // Only a pending request can resolve; a disconnect in between wins.
            ConnectionIntent::Resolved(account) => match state {
                ConnectionState::Connecting => ConnectionState::Connected(account),
                other => other,
            },
            ConnectionIntent::Failed | ConnectionIntent::Disconnect => {
                ConnectionState::Disconnected
            }
        }
    }
}
