pub mod formatters;
mod tables;

pub use tables::{render_token_info, render_user_table};

use crate::fetch::FetchState;
use crate::users::UserRecord;

/// One line (or table) per user-list state, as the CLI prints them.
pub fn render_user_state(state: &FetchState<Vec<UserRecord>>) -> String {
    match state {
        FetchState::Loading => "Loading...".to_string(),
        FetchState::Error(e) => format!("Error: {}", e),
        FetchState::Data(users) => render_user_table(users),
    }
}
