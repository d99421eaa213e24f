pub mod csv_source;
pub mod daily_table_reader;
pub mod threshold_reader;

pub use csv_source::{CsvSource, CsvTable};
pub use daily_table_reader::{DailyTable, DailyTableReader};
pub use threshold_reader::ThresholdReader;
