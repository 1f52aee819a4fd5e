//! Balance popup and allowance dialog visibility (MVI).

mod intent;
mod reducer;
mod state;

pub use intent::PopupIntent;
pub use reducer::PopupReducer;
pub use state::{BalancePopup, PopupState};
