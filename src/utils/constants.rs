/// Column names accepted for the date parts (lowercase)
pub const YEAR_COLUMNS: &[&str] = &["year", "aasta"];
pub const MONTH_COLUMNS: &[&str] = &["month", "kuu"];
pub const DAY_COLUMNS: &[&str] = &["day", "paev", "päev"];

/// Threshold table column applying one series to every station
pub const SHARED_THRESHOLD_COLUMN: &str = "threshold";

/// Cell values treated as missing readings
pub const MISSING_MARKERS: &[&str] = &["", "na", "nan", "-"];

/// Temperature constraints
pub const MIN_VALID_TEMP: f64 = -60.0;
pub const MAX_VALID_TEMP: f64 = 60.0;

/// Detection defaults
pub const DEFAULT_FIXED_THRESHOLD: f64 = 27.0;
pub const HEATWAVE_MIN_DAYS: usize = 3;

/// First month of a winter season (October to September)
pub const COLD_SEASON_START_MONTH: u32 = 10;

/// Season column value for the all-seasons row of the summary
pub const ALL_SEASONS_LABEL: &str = "all";

/// Leap year used to validate calendar days such as Feb 29
pub const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Processing defaults
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Environment variable prefix for settings
pub const ENV_PREFIX: &str = "HEATWAVE";

/// Output formats
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_JSON: &str = "json";
