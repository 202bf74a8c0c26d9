//! Display helpers shared by command handlers.

mod format;

pub use format::{format_date_full, format_date_short, format_history, format_long_entry};
