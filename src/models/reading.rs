use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::Direction;
use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temperature: f64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, temperature: f64) -> Self {
        Self { date, temperature }
    }
}

/// Raw content of one temperature cell as read from the table
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureCell {
    Value(f64),
    Missing,
    Invalid(String),
}

impl TemperatureCell {
    pub fn is_missing(&self) -> bool {
        matches!(self, TemperatureCell::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub date: NaiveDate,
    pub cell: TemperatureCell,
}

impl RawReading {
    pub fn new(date: NaiveDate, cell: TemperatureCell) -> Self {
        Self { date, cell }
    }

    pub fn value(date: NaiveDate, temperature: f64) -> Self {
        Self::new(date, TemperatureCell::Value(temperature))
    }
}

/// Inclusive range of physically plausible temperatures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, temperature: f64) -> bool {
        temperature.is_finite() && (self.min..=self.max).contains(&temperature)
    }
}

impl Default for ValidRange {
    fn default() -> Self {
        Self::new(MIN_VALID_TEMP, MAX_VALID_TEMP)
    }
}

/// Ordered daily temperatures of one station.
///
/// Only built through [`StationSeries::from_readings`], so every series in
/// circulation has strictly increasing dates and plausible numeric readings.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    station: String,
    records: Vec<DailyRecord>,
}

impl StationSeries {
    pub fn from_readings(
        station: impl Into<String>,
        readings: &[RawReading],
        range: ValidRange,
    ) -> Result<Self> {
        let station = station.into();
        let mut records: Vec<DailyRecord> = Vec::with_capacity(readings.len());

        for reading in readings {
            if let Some(previous) = records.last() {
                if reading.date <= previous.date {
                    return Err(ProcessingError::DataOrder {
                        station,
                        previous: previous.date,
                        current: reading.date,
                    });
                }
            }

            let temperature = match &reading.cell {
                TemperatureCell::Value(t) if range.contains(*t) => *t,
                TemperatureCell::Value(t) => {
                    return Err(ProcessingError::InvalidTemperature {
                        station,
                        date: reading.date,
                        reason: format!(
                            "{} is outside valid range [{}, {}]",
                            t, range.min, range.max
                        ),
                    });
                }
                TemperatureCell::Missing => {
                    return Err(ProcessingError::InvalidTemperature {
                        station,
                        date: reading.date,
                        reason: "missing value".to_string(),
                    });
                }
                TemperatureCell::Invalid(text) => {
                    return Err(ProcessingError::InvalidTemperature {
                        station,
                        date: reading.date,
                        reason: format!("non-numeric value '{}'", text),
                    });
                }
            };

            records.push(DailyRecord::new(reading.date, temperature));
        }

        Ok(Self { station, records })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Split records into contiguous per-season slices, in date order
    pub fn seasons(&self, direction: Direction) -> Vec<(i32, &[DailyRecord])> {
        let mut slices = Vec::new();
        let mut start = 0;

        for i in 1..=self.records.len() {
            let season = direction.season_of(self.records[start].date);
            if i == self.records.len() || direction.season_of(self.records[i].date) != season {
                slices.push((season, &self.records[start..i]));
                start = i;
            }
        }

        slices
    }

    /// Seasons present in the series, without slicing
    pub fn season_keys(&self, direction: Direction) -> Vec<i32> {
        let mut keys: Vec<i32> = self
            .records
            .iter()
            .map(|r| direction.season_of(r.date))
            .collect();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn build(station: &str, readings: &[RawReading]) -> Result<StationSeries> {
        StationSeries::from_readings(station, readings, ValidRange::default())
    }

    #[test]
    fn test_series_from_valid_readings() {
        let readings = vec![
            RawReading::value(date(2023, 7, 1), 25.5),
            RawReading::value(date(2023, 7, 2), 28.0),
        ];

        let series = build("Tartu", &readings).unwrap();

        assert_eq!(series.station(), "Tartu");
        assert_eq!(series.len(), 2);
        assert_eq!(series.records()[1].temperature, 28.0);
        assert_eq!(series.date_range(), Some((date(2023, 7, 1), date(2023, 7, 2))));
    }

    #[test]
    fn test_duplicate_date_is_order_error() {
        let readings = vec![
            RawReading::value(date(2023, 7, 1), 25.5),
            RawReading::value(date(2023, 7, 1), 26.0),
        ];

        let err = build("Tartu", &readings).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::DataOrder { ref station, .. } if station == "Tartu"
        ));
    }

    #[test]
    fn test_backwards_date_is_order_error() {
        let readings = vec![
            RawReading::value(date(2023, 7, 2), 25.5),
            RawReading::value(date(2023, 7, 1), 26.0),
        ];

        let err = build("Tartu", &readings).unwrap_err();
        match err {
            ProcessingError::DataOrder { previous, current, .. } => {
                assert_eq!(previous, date(2023, 7, 2));
                assert_eq!(current, date(2023, 7, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_and_invalid_cells_are_rejected() {
        let missing = vec![RawReading::new(date(2023, 7, 3), TemperatureCell::Missing)];
        let err = build("Võru", &missing).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::InvalidTemperature { date: d, .. } if d == date(2023, 7, 3)
        ));

        let garbage = vec![RawReading::new(
            date(2023, 7, 3),
            TemperatureCell::Invalid("x".into()),
        )];
        let err = build("Võru", &garbage).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_out_of_range_temperature() {
        let readings = vec![RawReading::value(date(2023, 7, 1), 61.0)];
        let err = build("Tartu", &readings).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidTemperature { .. }));

        let readings = vec![RawReading::value(date(2023, 1, 1), -60.0)];
        assert!(build("Tartu", &readings).is_ok());
    }

    #[test]
    fn test_season_split() {
        let readings = vec![
            RawReading::value(date(2022, 9, 30), 10.0),
            RawReading::value(date(2022, 12, 31), -5.0),
            RawReading::value(date(2023, 1, 1), -6.0),
            RawReading::value(date(2023, 4, 2), 12.0),
        ];
        let series = build("Tartu", &readings).unwrap();

        let years = series.seasons(Direction::Heat);
        let lengths: Vec<(i32, usize)> = years.iter().map(|(y, r)| (*y, r.len())).collect();
        assert_eq!(lengths, vec![(2022, 2), (2023, 2)]);

        // Winters run October to September, so New Year stays inside one season
        let winters = series.seasons(Direction::Cold);
        let lengths: Vec<(i32, usize)> = winters.iter().map(|(y, r)| (*y, r.len())).collect();
        assert_eq!(lengths, vec![(2021, 1), (2022, 3)]);
        assert_eq!(series.season_keys(Direction::Cold), vec![2021, 2022]);
    }
}
