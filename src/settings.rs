use crate::error::{ProcessingError, Result};
use crate::models::{Direction, ValidRange};
use crate::readers::CsvSource;
use crate::utils::constants::{
    DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_FIXED_THRESHOLD, ENV_PREFIX, HEATWAVE_MIN_DAYS,
    MAX_VALID_TEMP, MIN_VALID_TEMP,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Detection settings.
///
/// Sources in increasing precedence: built-in defaults, an optional settings
/// file, `HEATWAVE_*` environment variables, then command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(range(min = -100.0, max = 100.0))]
    pub fixed_threshold: f64,

    #[validate(range(min = 1, max = 366))]
    pub min_days: usize,

    pub direction: Direction,

    /// Restart detection each season (calendar year, or October-September winter)
    pub split_by_season: bool,

    #[validate(range(min = -100.0, max = 100.0))]
    pub min_valid_temp: f64,

    #[validate(range(min = -100.0, max = 100.0))]
    pub max_valid_temp: f64,

    #[validate(length(equal = 1))]
    pub delimiter: String,

    #[validate(length(min = 1))]
    pub encoding: String,

    pub use_mmap: bool,

    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_threshold: DEFAULT_FIXED_THRESHOLD,
            min_days: HEATWAVE_MIN_DAYS,
            direction: Direction::Heat,
            split_by_season: false,
            min_valid_temp: MIN_VALID_TEMP,
            max_valid_temp: MAX_VALID_TEMP,
            delimiter: DEFAULT_DELIMITER.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            use_mmap: false,
            max_workers: num_cpus::get(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("fixed_threshold", defaults.fixed_threshold)?
            .set_default("min_days", defaults.min_days as i64)?
            .set_default("direction", defaults.direction.to_string())?
            .set_default("split_by_season", defaults.split_by_season)?
            .set_default("min_valid_temp", defaults.min_valid_temp)?
            .set_default("max_valid_temp", defaults.max_valid_temp)?
            .set_default("delimiter", defaults.delimiter)?
            .set_default("encoding", defaults.encoding)?
            .set_default("use_mmap", defaults.use_mmap)?
            .set_default("max_workers", defaults.max_workers as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        tracing::debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Field ranges plus checks spanning several fields
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.min_valid_temp >= self.max_valid_temp {
            return Err(ProcessingError::Config(format!(
                "min_valid_temp ({}) must be below max_valid_temp ({})",
                self.min_valid_temp, self.max_valid_temp
            )));
        }

        Ok(())
    }

    pub fn valid_range(&self) -> ValidRange {
        ValidRange::new(self.min_valid_temp, self.max_valid_temp)
    }

    pub fn csv_source(&self) -> Result<CsvSource> {
        let delimiter = self.delimiter.chars().next().unwrap_or(DEFAULT_DELIMITER);
        Ok(CsvSource::new()
            .with_delimiter(delimiter)?
            .with_encoding(&self.encoding)?
            .with_mmap(self.use_mmap))
    }
}
