use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::models::ThresholdSet;
use crate::processors::{SeriesChecker, StationProcessor};
use crate::readers::{DailyTableReader, ThresholdReader};
use crate::settings::Settings;
use crate::utils::logging;
use crate::utils::progress::ProgressReporter;
use crate::utils::{generate_default_report_filename, summary_filename_for};
use crate::writers::{DetectionReport, FailedStation, ReportWriter};
use tracing::{info, warn};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Detect {
            input,
            thresholds,
            threshold,
            output_file,
            format,
            summary_file,
            direction,
            min_days,
            split_by_season,
            keep_going,
            max_workers,
        } => {
            if let Some(value) = threshold {
                settings.fixed_threshold = value;
            }
            if let Some(direction) = direction {
                settings.direction = direction.parse()?;
            }
            if let Some(min_days) = min_days {
                settings.min_days = min_days;
            }
            if split_by_season {
                settings.split_by_season = true;
            }
            if let Some(workers) = max_workers {
                settings.max_workers = workers;
            }
            settings.check()?;

            let writer = ReportWriter::new().with_format(&format)?;
            let source = settings.csv_source()?;

            info!(
                input = %input.display(),
                encoding = source.encoding_name(),
                "Reading daily table"
            );
            let table = DailyTableReader::with_source(source.clone()).read_table(&input)?;

            let threshold_set = match &thresholds {
                Some(path) => {
                    info!(path = %path.display(), "Reading day-specific thresholds");
                    ThresholdReader::with_source(source).read_thresholds(path)?
                }
                None => ThresholdSet::Fixed(settings.fixed_threshold),
            };

            println!(
                "Detecting {}s in {} stations ({} days)...",
                settings.direction.wave_name(),
                table.station_count(),
                table.row_count()
            );

            let progress = ProgressReporter::new(
                table.station_count() as u64,
                "Processing stations...",
                false,
            );

            let processor = StationProcessor::new(settings.max_workers)
                .with_direction(settings.direction)
                .with_min_days(settings.min_days)
                .with_split_by_season(settings.split_by_season)
                .with_valid_range(settings.valid_range());

            let outcomes = processor.process_table(&table, &threshold_set, Some(&progress))?;
            progress.finish_with_message("Stations processed");

            let mut stations = Vec::new();
            let mut failed = Vec::new();
            for outcome in outcomes {
                let skipped = outcome.is_skipped();
                match outcome.result {
                    Ok(report) => stations.push(report),
                    Err(e) if skipped || keep_going => {
                        warn!(station = %outcome.station, error = %e, "Skipping station");
                        failed.push(FailedStation {
                            station: outcome.station,
                            error: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }

            if stations.is_empty() {
                return Err(ProcessingError::MissingData(
                    "No station could be processed".to_string(),
                ));
            }

            let report = DetectionReport {
                direction: settings.direction,
                threshold: threshold_set.tag(),
                min_days: settings.min_days,
                stations,
                failed,
            };

            let output_file = output_file.unwrap_or_else(|| {
                generate_default_report_filename(
                    settings.direction,
                    &threshold_set.tag(),
                    writer.format().extension(),
                )
            });
            let summary_file = summary_file
                .unwrap_or_else(|| summary_filename_for(&output_file.with_extension("csv")));

            writer.write_report(&report, &output_file)?;
            writer.write_summary(&report, &summary_file)?;

            println!("\n{}", writer.render_summary(&report));
            println!("FINISHED! Output written to {}", output_file.display());
            println!("Seasonal statistics written to {}", summary_file.display());
        }

        Commands::Validate { input } => {
            settings.check()?;

            println!("Validating daily table: {}", input.display());

            let progress = ProgressReporter::new_spinner("Validating data...", false);

            let table = DailyTableReader::with_source(settings.csv_source()?).read_table(&input)?;
            let checker = SeriesChecker::new(settings.valid_range());
            let report = checker.check_table(&table);

            progress.finish_with_message("Validation complete");

            println!("\n{}", checker.generate_summary(&report));

            let unusable = report.stations.len() - report.usable_stations();
            if unusable == 0 {
                println!("✅ All stations passed validation checks");
            } else {
                println!("⚠️  {} stations cannot be processed", unusable);
            }
        }
    }

    Ok(())
}
