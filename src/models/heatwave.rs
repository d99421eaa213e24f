use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed run of heat days as produced by the grouper, qualifying or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Heat days in the run, bridge days excluded
    pub heat_days: usize,
}

impl HeatRun {
    /// Inclusive calendar span, bridge days included
    pub fn span_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn bridged_days(&self) -> usize {
        self.span_days().saturating_sub(self.heat_days)
    }

    pub fn qualifies(&self, min_days: usize) -> bool {
        self.span_days() >= min_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatwave {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub heat_days: usize,
}

impl Heatwave {
    pub fn duration_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn bridged_days(&self) -> usize {
        self.duration_days().saturating_sub(self.heat_days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

impl From<HeatRun> for Heatwave {
    fn from(run: HeatRun) -> Self {
        Self {
            start: run.start,
            end: run.end,
            heat_days: run.heat_days,
        }
    }
}

/// Statistics of one station over one season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonSummary {
    /// Year the season starts in
    pub season: i32,
    pub heat_days: usize,
    pub heatwaves: usize,
    pub max_duration: usize,
    pub heatwave_days: usize,
}

/// Everything detected for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub station: String,
    pub days: usize,
    pub heatwaves: Vec<Heatwave>,
    pub seasons: Vec<SeasonSummary>,
}

impl StationReport {
    pub fn total_heatwave_days(&self) -> usize {
        self.heatwaves.iter().map(|h| h.duration_days()).sum()
    }

    pub fn longest(&self) -> Option<&Heatwave> {
        self.heatwaves.iter().max_by_key(|h| h.duration_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_and_bridges() {
        let run = HeatRun {
            start: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 7, 5).unwrap(),
            heat_days: 4,
        };

        assert_eq!(run.span_days(), 5);
        assert_eq!(run.bridged_days(), 1);
        assert!(run.qualifies(3));
        assert!(!run.qualifies(6));

        let wave = Heatwave::from(run);
        assert_eq!(wave.duration_days(), 5);
        assert!(wave.contains(NaiveDate::from_ymd_opt(2023, 7, 3).unwrap()));
        assert!(!wave.contains(NaiveDate::from_ymd_opt(2023, 7, 6).unwrap()));
    }
}
