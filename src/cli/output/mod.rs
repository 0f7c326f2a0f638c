//! Terminal output helpers

pub mod progress;
pub mod table;

pub use progress::{create_progress_bar, create_spinner};
pub use table::TableFormatter;
