use crate::analyzers::SeasonAnalyzer;
use crate::error::{ProcessingError, Result};
use crate::models::{
    DailyRecord, Direction, HeatRun, Heatwave, StationReport, StationSeries, Threshold,
    ThresholdSet, ValidRange,
};
use crate::processors::classifier::HeatDayClassifier;
use crate::processors::grouper::HeatwaveGrouper;
use crate::readers::DailyTable;
use crate::utils::constants::HEATWAVE_MIN_DAYS;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result for one station column
#[derive(Debug)]
pub struct StationOutcome {
    pub station: String,
    pub result: Result<StationReport>,
}

impl StationOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.result, Err(ProcessingError::StationNotFound { .. }))
    }
}

pub struct StationProcessor {
    max_workers: usize,
    direction: Direction,
    min_days: usize,
    split_by_season: bool,
    valid_range: ValidRange,
}

impl StationProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            direction: Direction::Heat,
            min_days: HEATWAVE_MIN_DAYS,
            split_by_season: false,
            valid_range: ValidRange::default(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_min_days(mut self, min_days: usize) -> Self {
        self.min_days = min_days;
        self
    }

    /// Restart detection at every season boundary of the direction
    pub fn with_split_by_season(mut self, split_by_season: bool) -> Self {
        self.split_by_season = split_by_season;
        self
    }

    pub fn with_valid_range(mut self, valid_range: ValidRange) -> Self {
        self.valid_range = valid_range;
        self
    }

    /// Detect heatwaves for every station of the table, in column order
    pub fn process_table(
        &self,
        table: &DailyTable,
        thresholds: &ThresholdSet,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<StationOutcome>> {
        let stations = table.stations();
        let processed = AtomicUsize::new(0);

        tracing::info!(
            stations = stations.len(),
            rows = table.row_count(),
            workers = self.max_workers,
            direction = %self.direction,
            "Detecting {}s",
            self.direction.wave_name()
        );

        let run_station = |station: &String| {
            let result = self.process_column(table, station, thresholds);

            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(p) = progress {
                p.update(count as u64);
            }

            StationOutcome {
                station: station.clone(),
                result,
            }
        };

        let outcomes: Vec<StationOutcome> = if self.max_workers == 1 {
            stations.iter().map(run_station).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.max_workers)
                .build()
                .map_err(|e| ProcessingError::Config(e.to_string()))?;

            // collect() on an indexed parallel iterator keeps column order
            pool.install(|| stations.par_iter().map(run_station).collect())
        };

        Ok(outcomes)
    }

    fn process_column(
        &self,
        table: &DailyTable,
        station: &str,
        thresholds: &ThresholdSet,
    ) -> Result<StationReport> {
        let threshold = thresholds.for_station(station)?;
        let series = table.series(station, self.valid_range)?;
        self.process_series(&series, &threshold)
    }

    /// Detect heatwaves in one validated series
    pub fn process_series(
        &self,
        series: &StationSeries,
        threshold: &Threshold,
    ) -> Result<StationReport> {
        let analyzer = SeasonAnalyzer::new(self.min_days).with_direction(self.direction);

        let (runs, seasons) = if self.split_by_season {
            let slices = series.seasons(self.direction);
            let mut runs = Vec::new();
            let mut seasons = Vec::with_capacity(slices.len());
            for (season, records) in slices {
                let season_runs = self.runs(series.station(), records, threshold)?;
                seasons.push(analyzer.summarize(season, &season_runs));
                runs.extend(season_runs);
            }
            (runs, seasons)
        } else {
            let runs = self.runs(series.station(), series.records(), threshold)?;
            let keys = series.season_keys(self.direction);
            let seasons = analyzer.summarize_by_start_season(&keys, &runs);
            (runs, seasons)
        };

        let heatwaves: Vec<Heatwave> = runs
            .into_iter()
            .filter(|run| run.qualifies(self.min_days))
            .map(Heatwave::from)
            .collect();

        tracing::debug!(
            station = series.station(),
            days = series.len(),
            heatwaves = heatwaves.len(),
            "Station processed"
        );

        Ok(StationReport {
            station: series.station().to_string(),
            days: series.len(),
            heatwaves,
            seasons,
        })
    }

    fn runs(
        &self,
        station: &str,
        records: &[DailyRecord],
        threshold: &Threshold,
    ) -> Result<Vec<HeatRun>> {
        let classifier =
            HeatDayClassifier::new(station, threshold).with_direction(self.direction);
        let days = classifier.classify(records)?;
        Ok(HeatwaveGrouper::with_min_days(self.min_days).runs(&days))
    }
}

impl Default for StationProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
