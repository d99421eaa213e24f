pub mod cells;
pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use filename::{generate_default_report_filename, summary_filename_for};
pub use progress::ProgressReporter;
