use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Station {station}: no threshold for {month:02}-{day:02}")]
    MissingThreshold { station: String, month: u32, day: u32 },

    #[error("Station {station}: invalid temperature on {date}: {reason}")]
    InvalidTemperature {
        station: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("Station {station}: date {current} does not follow {previous}")]
    DataOrder {
        station: String,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Station {station} not found in threshold table")]
    StationNotFound { station: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// Station named by the error, if any
    pub fn station(&self) -> Option<&str> {
        match self {
            ProcessingError::MissingThreshold { station, .. }
            | ProcessingError::InvalidTemperature { station, .. }
            | ProcessingError::DataOrder { station, .. }
            | ProcessingError::StationNotFound { station } => Some(station),
            _ => None,
        }
    }
}
