use crate::models::{RawReading, TemperatureCell, ValidRange};
use crate::readers::DailyTable;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesIssue {
    pub date: NaiveDate,
    pub issue_type: IssueType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Missing,
    NonNumeric,
    OutOfRange,
    OutOfOrder,
    SuspiciousJump,
}

impl IssueType {
    /// Whether the issue prevents detection for the station
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IssueType::SuspiciousJump)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StationCheck {
    pub station: String,
    pub total_days: usize,
    pub valid_days: usize,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub issues: Vec<SeriesIssue>,
}

impl StationCheck {
    pub fn is_usable(&self) -> bool {
        !self.issues.iter().any(|i| i.issue_type.is_fatal())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeriesReport {
    pub stations: Vec<StationCheck>,
}

impl SeriesReport {
    pub fn usable_stations(&self) -> usize {
        self.stations.iter().filter(|s| s.is_usable()).count()
    }

    pub fn total_issues(&self) -> usize {
        self.stations.iter().map(|s| s.issues.len()).sum()
    }
}

/// Collects every problem of each station column instead of stopping at the first
pub struct SeriesChecker {
    valid_range: ValidRange,
    temperature_jump_threshold: f64,
}

impl SeriesChecker {
    pub fn new(valid_range: ValidRange) -> Self {
        Self {
            valid_range,
            temperature_jump_threshold: 20.0, // 20°C jump between consecutive days
        }
    }

    pub fn check_table(&self, table: &DailyTable) -> SeriesReport {
        SeriesReport {
            stations: table
                .iter()
                .map(|(station, readings)| self.check_station(station, readings))
                .collect(),
        }
    }

    fn check_station(&self, station: &str, readings: &[RawReading]) -> StationCheck {
        let mut check = StationCheck {
            station: station.to_string(),
            total_days: readings.len(),
            ..Default::default()
        };
        let mut previous_date: Option<NaiveDate> = None;
        let mut previous_temp: Option<f64> = None;

        for reading in readings {
            if let Some(prev) = previous_date {
                if reading.date <= prev {
                    check.issues.push(SeriesIssue {
                        date: reading.date,
                        issue_type: IssueType::OutOfOrder,
                        details: format!("date does not follow {}", prev),
                    });
                }
            }
            previous_date = Some(reading.date);

            let temp = match &reading.cell {
                TemperatureCell::Value(t) if self.valid_range.contains(*t) => *t,
                TemperatureCell::Value(t) => {
                    check.issues.push(SeriesIssue {
                        date: reading.date,
                        issue_type: IssueType::OutOfRange,
                        details: format!(
                            "temperature {} is outside valid range [{}, {}]",
                            t, self.valid_range.min, self.valid_range.max
                        ),
                    });
                    previous_temp = None;
                    continue;
                }
                TemperatureCell::Missing => {
                    check.issues.push(SeriesIssue {
                        date: reading.date,
                        issue_type: IssueType::Missing,
                        details: "missing value".to_string(),
                    });
                    previous_temp = None;
                    continue;
                }
                TemperatureCell::Invalid(text) => {
                    check.issues.push(SeriesIssue {
                        date: reading.date,
                        issue_type: IssueType::NonNumeric,
                        details: format!("non-numeric value '{}'", text),
                    });
                    previous_temp = None;
                    continue;
                }
            };

            if let Some(prev) = previous_temp {
                let jump = (temp - prev).abs();
                if jump > self.temperature_jump_threshold {
                    check.issues.push(SeriesIssue {
                        date: reading.date,
                        issue_type: IssueType::SuspiciousJump,
                        details: format!("temperature jumped {:.1}°C", jump),
                    });
                }
            }
            previous_temp = Some(temp);

            check.valid_days += 1;
            check.min_temp = Some(check.min_temp.map_or(temp, |t| t.min(temp)));
            check.max_temp = Some(check.max_temp.map_or(temp, |t| t.max(temp)));
        }

        check
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &SeriesReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Series Check Report ===\n");
        summary.push_str(&format!("Stations: {}\n", report.stations.len()));
        summary.push_str(&format!("Usable Stations: {}\n", report.usable_stations()));
        summary.push_str(&format!("Total Issues: {}\n", report.total_issues()));

        for station in &report.stations {
            let range = match (station.min_temp, station.max_temp) {
                (Some(min), Some(max)) => format!("{:.1}..{:.1}°C", min, max),
                _ => "no data".to_string(),
            };
            summary.push_str(&format!(
                "\n{}: {}/{} valid days, {}, {} issues\n",
                station.station,
                station.valid_days,
                station.total_days,
                range,
                station.issues.len()
            ));

            for (i, issue) in station.issues.iter().take(10).enumerate() {
                summary.push_str(&format!("  {}. {}: {}\n", i + 1, issue.date, issue.details));
            }
        }

        summary
    }
}

impl Default for SeriesChecker {
    fn default() -> Self {
        Self::new(ValidRange::default())
    }
}
