use crate::error::{ProcessingError, Result};
use crate::models::{RawReading, StationSeries, TemperatureCell, ValidRange};
use crate::readers::csv_source::{CsvSource, CsvTable};
use crate::utils::cells::{find_column, parse_date_part, parse_temperature_cell};
use crate::utils::constants::{DAY_COLUMNS, MONTH_COLUMNS, YEAR_COLUMNS};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

/// Daily temperatures of several stations, one column per station
#[derive(Debug, Clone)]
pub struct DailyTable {
    pub dates: Vec<NaiveDate>,
    stations: Vec<String>,
    readings: Vec<Vec<RawReading>>,
}

impl DailyTable {
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// Raw readings of one station in table row order
    pub fn readings(&self, station: &str) -> Option<&[RawReading]> {
        self.stations
            .iter()
            .position(|s| s == station)
            .map(|i| self.readings[i].as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RawReading])> {
        self.stations
            .iter()
            .map(|s| s.as_str())
            .zip(self.readings.iter().map(|r| r.as_slice()))
    }

    /// Validate one station's column into a series
    pub fn series(&self, station: &str, range: ValidRange) -> Result<StationSeries> {
        let readings = self
            .readings(station)
            .ok_or_else(|| ProcessingError::StationNotFound {
                station: station.to_string(),
            })?;
        StationSeries::from_readings(station, readings, range)
    }

    pub fn missing_cells(&self, station: &str) -> usize {
        self.readings(station)
            .map(|r| r.iter().filter(|reading| reading.cell.is_missing()).count())
            .unwrap_or(0)
    }
}

pub struct DailyTableReader {
    source: CsvSource,
}

impl DailyTableReader {
    pub fn new() -> Self {
        Self {
            source: CsvSource::new(),
        }
    }

    pub fn with_source(source: CsvSource) -> Self {
        Self { source }
    }

    pub fn read_table(&self, path: &Path) -> Result<DailyTable> {
        let table = self.source.read_table(path)?;
        let daily = self.build(table)?;

        tracing::debug!(
            path = %path.display(),
            rows = daily.row_count(),
            stations = daily.station_count(),
            "Read daily table"
        );

        Ok(daily)
    }

    pub fn parse_str(&self, text: &str) -> Result<DailyTable> {
        let table = self.source.parse_table(text)?;
        self.build(table)
    }

    fn build(&self, table: CsvTable) -> Result<DailyTable> {
        let column = |names: &[&str], label: &str| {
            find_column(&table.headers, names).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Missing '{}' column", label))
            })
        };
        let year_col = column(YEAR_COLUMNS, "year")?;
        let month_col = column(MONTH_COLUMNS, "month")?;
        let day_col = column(DAY_COLUMNS, "day")?;

        let mut stations = Vec::new();
        let mut station_cols = Vec::new();
        let mut seen = HashSet::new();
        for (i, header) in table.headers.iter().enumerate() {
            if i == year_col || i == month_col || i == day_col {
                continue;
            }
            if header.is_empty() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Column {} has no station name",
                    i + 1
                )));
            }
            if !seen.insert(header.clone()) {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Duplicate station column: {}",
                    header
                )));
            }
            stations.push(header.clone());
            station_cols.push(i);
        }

        if stations.is_empty() {
            return Err(ProcessingError::InvalidFormat(
                "No station columns found".to_string(),
            ));
        }

        let mut dates = Vec::with_capacity(table.rows.len());
        let mut readings: Vec<Vec<RawReading>> =
            vec![Vec::with_capacity(table.rows.len()); stations.len()];

        for row in &table.rows {
            let date = Self::parse_row_date(row, year_col, month_col, day_col)?;
            dates.push(date);

            for (station_readings, &col) in readings.iter_mut().zip(&station_cols) {
                let cell = row
                    .get(col)
                    .map(parse_temperature_cell)
                    .unwrap_or(TemperatureCell::Missing);
                station_readings.push(RawReading::new(date, cell));
            }
        }

        Ok(DailyTable {
            dates,
            stations,
            readings,
        })
    }

    fn parse_row_date(
        row: &csv::StringRecord,
        year_col: usize,
        month_col: usize,
        day_col: usize,
    ) -> Result<NaiveDate> {
        let line = CsvTable::line_of(row);
        let part = |col: usize, field: &str| -> Result<i64> {
            let text = row.get(col).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Line {}: missing {}", line, field))
            })?;
            parse_date_part(text, field)
                .map_err(|e| ProcessingError::InvalidFormat(format!("Line {}: {}", line, e)))
        };

        let year = part(year_col, "year")?;
        let month = part(month_col, "month")?;
        let day = part(day_col, "day")?;

        i32::try_from(year)
            .ok()
            .zip(u32::try_from(month).ok())
            .zip(u32::try_from(day).ok())
            .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Line {}: invalid date {}-{}-{}",
                    line, year, month, day
                ))
            })
    }
}

impl Default for DailyTableReader {
    fn default() -> Self {
        Self::new()
    }
}
