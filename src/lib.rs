pub mod analysis;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ui;
pub mod users;

pub use error::{CompletionError, FetchError, LookupError};
pub use fetch::FetchState;
pub use ui::formatters::format_price;
