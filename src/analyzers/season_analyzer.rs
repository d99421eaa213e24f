use crate::models::{Direction, HeatRun, SeasonSummary};
use std::collections::BTreeMap;

pub struct SeasonAnalyzer {
    min_days: usize,
    direction: Direction,
}

impl SeasonAnalyzer {
    pub fn new(min_days: usize) -> Self {
        Self {
            min_days,
            direction: Direction::Heat,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Summarize the runs of one season slice
    pub fn summarize(&self, season: i32, runs: &[HeatRun]) -> SeasonSummary {
        let mut summary = SeasonSummary {
            season,
            ..Default::default()
        };

        for run in runs {
            summary.heat_days += run.heat_days;

            if run.qualifies(self.min_days) {
                let span = run.span_days();
                summary.heatwaves += 1;
                summary.heatwave_days += span;
                summary.max_duration = summary.max_duration.max(span);
            }
        }

        summary
    }

    /// Summaries per season for runs of an unsplit series.
    ///
    /// Runs are attributed to the season they start in. `seasons` lists every
    /// season present in the data so quiet seasons still get a row.
    pub fn summarize_by_start_season(
        &self,
        seasons: &[i32],
        runs: &[HeatRun],
    ) -> Vec<SeasonSummary> {
        let mut by_season: BTreeMap<i32, Vec<HeatRun>> =
            seasons.iter().map(|&season| (season, Vec::new())).collect();

        for run in runs {
            by_season
                .entry(self.direction.season_of(run.start))
                .or_default()
                .push(*run);
        }

        by_season
            .iter()
            .map(|(&season, runs)| self.summarize(season, runs))
            .collect()
    }

    /// Summary over all seasons, totals and overall maximum
    pub fn combine(seasons: &[SeasonSummary]) -> SeasonSummary {
        seasons.iter().fold(SeasonSummary::default(), |mut acc, s| {
            acc.heat_days += s.heat_days;
            acc.heatwaves += s.heatwaves;
            acc.heatwave_days += s.heatwave_days;
            acc.max_duration = acc.max_duration.max(s.max_duration);
            acc
        })
    }
}
