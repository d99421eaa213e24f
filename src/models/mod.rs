pub mod heatwave;
pub mod reading;
pub mod threshold;

pub use heatwave::{HeatRun, Heatwave, SeasonSummary, StationReport};
pub use reading::{DailyRecord, RawReading, StationSeries, TemperatureCell, ValidRange};
pub use threshold::{CalendarDay, DayThresholds, Direction, Threshold, ThresholdSet};
