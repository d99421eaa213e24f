use crate::analyzers::SeasonAnalyzer;
use crate::error::{ProcessingError, Result};
use crate::models::{Direction, SeasonSummary, StationReport};
use crate::utils::constants::{ALL_SEASONS_LABEL, FORMAT_CSV, FORMAT_JSON};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => FORMAT_CSV,
            OutputFormat::Json => FORMAT_JSON,
        }
    }
}

/// Station that produced no report, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct FailedStation {
    pub station: String,
    pub error: String,
}

/// Complete result of one detection run
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub direction: Direction,
    pub threshold: String,
    pub min_days: usize,
    pub stations: Vec<StationReport>,
    pub failed: Vec<FailedStation>,
}

impl DetectionReport {
    pub fn total_heatwaves(&self) -> usize {
        self.stations.iter().map(|s| s.heatwaves.len()).sum()
    }
}

#[derive(Serialize)]
struct HeatwaveRow<'a> {
    station: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    duration_days: usize,
    heat_days: usize,
    bridged_days: usize,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    station: &'a str,
    season: String,
    heat_days: usize,
    heatwaves: usize,
    max_duration: usize,
    heatwave_days: usize,
}

impl<'a> SummaryRow<'a> {
    fn new(station: &'a str, season: String, summary: &SeasonSummary) -> Self {
        Self {
            station,
            season,
            heat_days: summary.heat_days,
            heatwaves: summary.heatwaves,
            max_duration: summary.max_duration,
            heatwave_days: summary.heatwave_days,
        }
    }
}

pub struct ReportWriter {
    format: OutputFormat,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Csv,
        }
    }

    pub fn with_format(mut self, format: &str) -> Result<Self> {
        self.format = match format.to_lowercase().as_str() {
            FORMAT_CSV => OutputFormat::Csv,
            FORMAT_JSON => OutputFormat::Json,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unknown output format: {}",
                    format
                )))
            }
        };
        Ok(self)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write heatwaves (CSV) or the whole report (JSON) to `path`
    pub fn write_report(&self, report: &DetectionReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = BufWriter::new(File::create(path)?);
        match self.format {
            OutputFormat::Csv => self.write_heatwaves_csv(&report.stations, file)?,
            OutputFormat::Json => {
                let mut file = file;
                serde_json::to_writer_pretty(&mut file, report)?;
                writeln!(file)?;
                file.flush()?;
            }
        }

        tracing::info!(
            path = %path.display(),
            heatwaves = report.total_heatwaves(),
            "Report written"
        );
        Ok(())
    }

    /// Per-station, per-season statistics as CSV, closed by an all-seasons row
    pub fn write_summary(&self, report: &DetectionReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record([
            "station",
            "season",
            "heat_days",
            "heatwaves",
            "max_duration",
            "heatwave_days",
        ])?;

        for station in &report.stations {
            for season in &station.seasons {
                let label = report.direction.season_label(season.season);
                writer.serialize(SummaryRow::new(&station.station, label, season))?;
            }

            let total = SeasonAnalyzer::combine(&station.seasons);
            writer.serialize(SummaryRow::new(
                &station.station,
                ALL_SEASONS_LABEL.to_string(),
                &total,
            ))?;
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), "Summary written");
        Ok(())
    }

    pub fn write_heatwaves_csv<W: Write>(&self, stations: &[StationReport], out: W) -> Result<()> {
        // Header row even when nothing was detected
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record([
            "station",
            "start",
            "end",
            "duration_days",
            "heat_days",
            "bridged_days",
        ])?;

        for station in stations {
            for wave in &station.heatwaves {
                writer.serialize(HeatwaveRow {
                    station: &station.station,
                    start: wave.start,
                    end: wave.end,
                    duration_days: wave.duration_days(),
                    heat_days: wave.heat_days,
                    bridged_days: wave.bridged_days(),
                })?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Human-readable overview printed at the end of a run
    pub fn render_summary(&self, report: &DetectionReport) -> String {
        let mut summary = String::new();
        let name = report.direction.wave_name();

        summary.push_str(&format!("=== {} Report ===\n", capitalize(name)));
        summary.push_str(&format!(
            "Threshold: {}, minimum duration: {} days\n",
            report.threshold, report.min_days
        ));
        summary.push_str(&format!(
            "Stations: {} processed, {} failed\n",
            report.stations.len(),
            report.failed.len()
        ));
        summary.push_str(&format!("Total {}s: {}\n", name, report.total_heatwaves()));

        for station in &report.stations {
            let longest = station
                .longest()
                .map(|w| format!("longest {} days from {}", w.duration_days(), w.start))
                .unwrap_or_else(|| format!("no {}s", name));
            summary.push_str(&format!(
                "  {}: {} {}s, {} days in {}s, {}\n",
                station.station,
                station.heatwaves.len(),
                name,
                station.total_heatwave_days(),
                name,
                longest
            ));
        }

        for failed in &report.failed {
            summary.push_str(&format!("  {}: FAILED ({})\n", failed.station, failed.error));
        }

        summary
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Heatwave;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn report() -> DetectionReport {
        let start = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        DetectionReport {
            direction: Direction::Heat,
            threshold: "th_27".to_string(),
            min_days: 3,
            stations: vec![StationReport {
                station: "Tartu".to_string(),
                days: 10,
                heatwaves: vec![Heatwave {
                    start,
                    end: start + chrono::Duration::days(4),
                    heat_days: 4,
                }],
                seasons: vec![SeasonSummary {
                    season: 2023,
                    heat_days: 5,
                    heatwaves: 1,
                    max_duration: 5,
                    heatwave_days: 5,
                }],
            }],
            failed: vec![FailedStation {
                station: "Pärnu".to_string(),
                error: "missing value".to_string(),
            }],
        }
    }

    #[test]
    fn test_heatwaves_csv() {
        let mut out = Vec::new();
        ReportWriter::new()
            .write_heatwaves_csv(&report().stations, &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "station,start,end,duration_days,heat_days,bridged_days\n\
             Tartu,2023-07-01,2023-07-05,5,4,1\n"
        );
    }

    #[test]
    fn test_summary_and_json_files() -> Result<()> {
        let dir = TempDir::new()?;
        let summary_path = dir.path().join("nested").join("summary.csv");
        ReportWriter::new().write_summary(&report(), &summary_path)?;

        let text = std::fs::read_to_string(&summary_path)?;
        assert_eq!(
            text,
            "station,season,heat_days,heatwaves,max_duration,heatwave_days\n\
             Tartu,2023,5,1,5,5\n\
             Tartu,all,5,1,5,5\n"
        );

        let json_path = dir.path().join("report.json");
        ReportWriter::new()
            .with_format("JSON")?
            .write_report(&report(), &json_path)?;
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
        assert_eq!(value["direction"], "heat");
        assert_eq!(value["stations"][0]["heatwaves"][0]["start"], "2023-07-01");
        assert_eq!(value["failed"][0]["station"], "Pärnu");

        Ok(())
    }

    #[test]
    fn test_render_summary() {
        let text = ReportWriter::new().render_summary(&report());
        assert!(text.starts_with("=== Heatwave Report ==="));
        assert!(text.contains(
            "Tartu: 1 heatwaves, 5 days in heatwaves, longest 5 days from 2023-07-01"
        ));
        assert!(text.contains("Pärnu: FAILED"));
    }

    #[test]
    fn test_winter_summary_labels_and_totals() -> Result<()> {
        let mut report = report();
        report.direction = Direction::Cold;
        report.stations[0].seasons = vec![
            SeasonSummary {
                season: 2021,
                heat_days: 4,
                heatwaves: 1,
                max_duration: 4,
                heatwave_days: 4,
            },
            SeasonSummary {
                season: 2022,
                heat_days: 2,
                ..Default::default()
            },
        ];

        let dir = TempDir::new()?;
        let path = dir.path().join("summary.csv");
        ReportWriter::new().write_summary(&report, &path)?;

        assert_eq!(
            std::fs::read_to_string(&path)?,
            "station,season,heat_days,heatwaves,max_duration,heatwave_days\n\
             Tartu,2021/22,4,1,4,4\n\
             Tartu,2022/23,2,0,0,0\n\
             Tartu,all,6,1,4,4\n"
        );
        Ok(())
    }

    #[test]
    fn test_unknown_format() {
        assert!(ReportWriter::new().with_format("parquet").is_err());
    }
}
