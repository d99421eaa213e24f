use crate::error::{ProcessingError, Result};
use crate::models::{CalendarDay, DayThresholds, TemperatureCell, ThresholdSet};
use crate::readers::csv_source::{CsvSource, CsvTable};
use crate::utils::cells::{find_column, parse_date_part, parse_temperature_cell};
use crate::utils::constants::{DAY_COLUMNS, MONTH_COLUMNS, SHARED_THRESHOLD_COLUMN, YEAR_COLUMNS};
use std::collections::HashMap;
use std::path::Path;

/// Reads day-specific threshold tables.
///
/// Layout: `month` and `day` columns (an optional `year` column is ignored),
/// then either one `threshold` column shared by all stations or one column
/// per station. Empty cells leave that day without a threshold.
pub struct ThresholdReader {
    source: CsvSource,
}

impl ThresholdReader {
    pub fn new() -> Self {
        Self {
            source: CsvSource::new(),
        }
    }

    pub fn with_source(source: CsvSource) -> Self {
        Self { source }
    }

    pub fn read_thresholds(&self, path: &Path) -> Result<ThresholdSet> {
        let table = self.source.read_table(path)?;
        self.build(table)
    }

    pub fn parse_str(&self, text: &str) -> Result<ThresholdSet> {
        let table = self.source.parse_table(text)?;
        self.build(table)
    }

    fn build(&self, table: CsvTable) -> Result<ThresholdSet> {
        let month_col = find_column(&table.headers, MONTH_COLUMNS)
            .ok_or_else(|| ProcessingError::InvalidFormat("Missing 'month' column".to_string()))?;
        let day_col = find_column(&table.headers, DAY_COLUMNS)
            .ok_or_else(|| ProcessingError::InvalidFormat("Missing 'day' column".to_string()))?;
        let year_col = find_column(&table.headers, YEAR_COLUMNS);

        let value_cols: Vec<(usize, &String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != month_col && *i != day_col && Some(*i) != year_col)
            .collect();

        if value_cols.is_empty() {
            return Err(ProcessingError::InvalidFormat(
                "Threshold table has no value columns".to_string(),
            ));
        }

        let mut tables: Vec<DayThresholds> = vec![DayThresholds::new(); value_cols.len()];

        for row in &table.rows {
            let line = CsvTable::line_of(row);
            let day = Self::parse_calendar_day(row, month_col, day_col)
                .map_err(|e| ProcessingError::InvalidFormat(format!("Line {}: {}", line, e)))?;

            for (days, (col, name)) in tables.iter_mut().zip(&value_cols) {
                match row.get(*col).map(parse_temperature_cell) {
                    Some(TemperatureCell::Value(value)) if value.is_finite() => {
                        days.insert(day, value).map_err(|e| {
                            ProcessingError::InvalidFormat(format!("Line {}: {}", line, e))
                        })?
                    }
                    Some(TemperatureCell::Missing) | None => {}
                    Some(TemperatureCell::Value(_)) | Some(TemperatureCell::Invalid(_)) => {
                        return Err(ProcessingError::InvalidFormat(format!(
                            "Line {}: invalid threshold for {} on {}",
                            line, name, day
                        )));
                    }
                }
            }
        }

        let shared = value_cols.len() == 1
            && value_cols[0].1.trim().eq_ignore_ascii_case(SHARED_THRESHOLD_COLUMN);

        if shared {
            let table = tables.remove(0);
            tracing::debug!(days = table.len(), "Read shared day-specific thresholds");
            return Ok(ThresholdSet::Shared(table));
        }

        let per_station: HashMap<String, DayThresholds> = value_cols
            .iter()
            .map(|(_, name)| name.to_string())
            .zip(tables)
            .collect();

        if per_station.len() != value_cols.len() {
            return Err(ProcessingError::InvalidFormat(
                "Duplicate station column in threshold table".to_string(),
            ));
        }

        tracing::debug!(stations = per_station.len(), "Read per-station thresholds");
        Ok(ThresholdSet::PerStation(per_station))
    }

    fn parse_calendar_day(
        row: &csv::StringRecord,
        month_col: usize,
        day_col: usize,
    ) -> Result<CalendarDay> {
        let month = parse_date_part(row.get(month_col).unwrap_or(""), "month")?;
        let day = parse_date_part(row.get(day_col).unwrap_or(""), "day")?;

        match (u32::try_from(month), u32::try_from(day)) {
            (Ok(month), Ok(day)) => CalendarDay::new(month, day),
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Invalid calendar day: month {} day {}",
                month, day
            ))),
        }
    }
}

impl Default for ThresholdReader {
    fn default() -> Self {
        Self::new()
    }
}
