pub mod classifier;
pub mod grouper;
pub mod series_checker;
pub mod station_processor;

pub use classifier::{ClassifiedDay, HeatDayClassifier};
pub use grouper::HeatwaveGrouper;
pub use series_checker::{IssueType, SeriesChecker, SeriesIssue, SeriesReport, StationCheck};
pub use station_processor::{StationOutcome, StationProcessor};
