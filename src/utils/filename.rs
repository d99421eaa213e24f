use crate::models::Direction;
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default report filename: {kind}s-{tag}-{YYMMDD}.{ext}
pub fn generate_default_report_filename(
    direction: Direction,
    tag: &str,
    extension: &str,
) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "{}s-{}-{:02}{:02}{:02}.{}",
        direction.wave_name(),
        tag,
        year,
        month,
        day,
        extension
    );
    PathBuf::from("output").join(filename)
}

/// Summary file written next to a report: `x.csv` -> `x-summary.csv`
pub fn summary_filename_for(report: &std::path::Path) -> PathBuf {
    let stem = report
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let name = match report.extension() {
        Some(ext) => format!("{}-summary.{}", stem, ext.to_string_lossy()),
        None => format!("{}-summary", stem),
    };
    report.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_generate_default_report_filename() {
        let filename = generate_default_report_filename(Direction::Heat, "th_27", "csv");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("output/"));
        assert!(filename_str.ends_with(".csv"));

        let parts: Vec<&str> = filename_str.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[1].starts_with("heatwaves-th_27-"));
    }

    #[test]
    fn test_cold_filename() {
        let filename = generate_default_report_filename(Direction::Cold, "th_daily", "json");
        assert!(filename.to_string_lossy().contains("coldwaves-th_daily-"));
    }

    #[test]
    fn test_summary_filename() {
        assert_eq!(
            summary_filename_for(Path::new("output/waves.csv")),
            Path::new("output/waves-summary.csv")
        );
        assert_eq!(
            summary_filename_for(Path::new("waves")),
            Path::new("waves-summary")
        );
    }
}
