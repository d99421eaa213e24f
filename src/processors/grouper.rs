use crate::models::{HeatRun, Heatwave};
use crate::processors::classifier::ClassifiedDay;
use crate::utils::constants::HEATWAVE_MIN_DAYS;

#[derive(Debug, Clone, Copy)]
enum ScanState {
    NoRun,
    OpenRun(HeatRun),
    /// Run followed by one unconfirmed non-heat day
    PendingGap(HeatRun),
}

/// Groups classified days into heatwaves, tolerating single bridge days
pub struct HeatwaveGrouper {
    min_days: usize,
}

impl HeatwaveGrouper {
    pub fn new() -> Self {
        Self {
            min_days: HEATWAVE_MIN_DAYS,
        }
    }

    pub fn with_min_days(min_days: usize) -> Self {
        Self { min_days }
    }

    pub fn min_days(&self) -> usize {
        self.min_days
    }

    /// Every closed run in date order, qualifying or not
    pub fn runs(&self, days: &[ClassifiedDay]) -> Vec<HeatRun> {
        let mut runs = Vec::new();
        let mut state = ScanState::NoRun;

        for day in days {
            state = match (state, day.is_heat) {
                (ScanState::NoRun, true) => ScanState::OpenRun(HeatRun {
                    start: day.date,
                    end: day.date,
                    heat_days: 1,
                }),
                (ScanState::NoRun, false) => ScanState::NoRun,
                (ScanState::OpenRun(mut run), true) | (ScanState::PendingGap(mut run), true) => {
                    run.end = day.date;
                    run.heat_days += 1;
                    ScanState::OpenRun(run)
                }
                (ScanState::OpenRun(run), false) => ScanState::PendingGap(run),
                (ScanState::PendingGap(run), false) => {
                    runs.push(run);
                    ScanState::NoRun
                }
            };
        }

        // A trailing gap was never confirmed; the run still ends on its last heat day
        match state {
            ScanState::OpenRun(run) | ScanState::PendingGap(run) => runs.push(run),
            ScanState::NoRun => {}
        }

        runs
    }

    pub fn group(&self, days: &[ClassifiedDay]) -> Vec<Heatwave> {
        self.runs(days)
            .into_iter()
            .filter(|run| run.qualifies(self.min_days))
            .map(Heatwave::from)
            .collect()
    }
}

impl Default for HeatwaveGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
    }

    /// Build days from a pattern such as "HHNHH"
    fn days(pattern: &str) -> Vec<ClassifiedDay> {
        pattern
            .chars()
            .enumerate()
            .map(|(i, c)| ClassifiedDay {
                date: start() + chrono::Duration::days(i as i64),
                is_heat: c == 'H',
            })
            .collect()
    }

    fn offset(i: i64) -> NaiveDate {
        start() + chrono::Duration::days(i)
    }

    #[test]
    fn test_three_heat_days() {
        let waves = HeatwaveGrouper::new().group(&days("HHH"));
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].start, offset(0));
        assert_eq!(waves[0].end, offset(2));
        assert_eq!(waves[0].duration_days(), 3);
    }

    #[test]
    fn test_single_gap_is_bridged() {
        let waves = HeatwaveGrouper::new().group(&days("HHNHH"));
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].start, offset(0));
        assert_eq!(waves[0].end, offset(4));
        assert_eq!(waves[0].heat_days, 4);
        assert_eq!(waves[0].bridged_days(), 1);
    }

    #[test]
    fn test_double_gap_never_bridges() {
        let grouper = HeatwaveGrouper::new();
        assert!(grouper.group(&days("HHNNHH")).is_empty());
        assert_eq!(grouper.runs(&days("HHNNHH")).len(), 2);
    }

    #[test]
    fn test_double_gap_splits_long_runs() {
        let waves = HeatwaveGrouper::new().group(&days("HHHNNHHH"));
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].end, offset(2));
        assert_eq!(waves[1].start, offset(5));
    }

    #[test]
    fn test_bridged_span_of_three_qualifies() {
        let waves = HeatwaveGrouper::new().group(&days("NHNHN"));
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].start, offset(1));
        assert_eq!(waves[0].end, offset(3));
        assert_eq!(waves[0].heat_days, 2);
    }

    #[test]
    fn test_alternating_pattern_chains_bridges() {
        let waves = HeatwaveGrouper::new().group(&days("HNHNHNH"));
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].duration_days(), 7);
        assert_eq!(waves[0].heat_days, 4);
    }

    #[test]
    fn test_isolated_heat_day_is_dropped() {
        let waves = HeatwaveGrouper::new().group(&days("NNHNNHHHN"));
        assert_eq!(waves.len(), 1);
        assert!(!waves[0].contains(offset(2)));
    }

    #[test]
    fn test_trailing_gap_is_discarded() {
        let waves = HeatwaveGrouper::new().group(&days("NHHHN"));
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].end, offset(3));

        // HHN at end of input stays a two-day run
        assert!(HeatwaveGrouper::new().group(&days("HHN")).is_empty());
    }

    #[test]
    fn test_leading_gap_does_not_bridge() {
        let waves = HeatwaveGrouper::new().group(&days("NHH"));
        assert!(waves.is_empty());
    }

    #[test]
    fn test_empty_and_no_heat() {
        let grouper = HeatwaveGrouper::new();
        assert!(grouper.group(&[]).is_empty());
        assert!(grouper.runs(&days("NNNN")).is_empty());
    }

    #[test]
    fn test_custom_min_days() {
        let grouper = HeatwaveGrouper::with_min_days(5);
        assert!(grouper.group(&days("HHHH")).is_empty());
        assert_eq!(grouper.group(&days("HHHNH")).len(), 1);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let input = days("HHNHHNNHHHNHNNH");
        let grouper = HeatwaveGrouper::new();
        assert_eq!(grouper.group(&input), grouper.group(&input));
    }

    #[test]
    fn test_waves_are_ordered_and_separated() {
        let input = days("HHHNNHHNHHNNNHHHHNHH");
        let waves = HeatwaveGrouper::new().group(&input);

        assert_eq!(waves.len(), 3);
        for wave in &waves {
            assert!(wave.end >= wave.start);
            assert!(wave.duration_days() >= 3);
        }
        for pair in waves.windows(2) {
            // At least two non-heat days between waves, otherwise they would have merged
            assert!((pair[1].start - pair[0].end).num_days() >= 3);
        }
    }
}
