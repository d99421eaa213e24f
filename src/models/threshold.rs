use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{COLD_SEASON_START_MONTH, REFERENCE_LEAP_YEAR};

/// Calendar day independent of year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_none() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Invalid calendar day: month {} day {}",
                month, day
            )));
        }
        Ok(Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Partial mapping from calendar day to threshold value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayThresholds {
    values: BTreeMap<CalendarDay, f64>,
}

impl DayThresholds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a second entry for the same day is rejected
    pub fn insert(&mut self, day: CalendarDay, value: f64) -> Result<()> {
        if self.values.insert(day, value).is_some() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Duplicate threshold for {}",
                day
            )));
        }
        Ok(())
    }

    pub fn get(&self, day: CalendarDay) -> Option<f64> {
        self.values.get(&day).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn covers_leap_day(&self) -> bool {
        self.values.contains_key(&CalendarDay { month: 2, day: 29 })
    }
}

impl FromIterator<(CalendarDay, f64)> for DayThresholds {
    fn from_iter<I: IntoIterator<Item = (CalendarDay, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Threshold applicable to one station
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    Fixed(f64),
    DaySpecific(DayThresholds),
}

impl Threshold {
    /// Threshold for `date`, `None` when a day-specific table lacks the day
    pub fn value_for(&self, date: NaiveDate) -> Option<f64> {
        match self {
            Threshold::Fixed(value) => Some(*value),
            Threshold::DaySpecific(table) => table.get(CalendarDay::of(date)),
        }
    }
}

/// Thresholds for a whole dataset
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdSet {
    Fixed(f64),
    Shared(DayThresholds),
    PerStation(HashMap<String, DayThresholds>),
}

impl ThresholdSet {
    pub fn for_station(&self, station: &str) -> Result<Threshold> {
        match self {
            ThresholdSet::Fixed(value) => Ok(Threshold::Fixed(*value)),
            ThresholdSet::Shared(table) => Ok(Threshold::DaySpecific(table.clone())),
            ThresholdSet::PerStation(tables) => tables
                .get(station)
                .map(|table| Threshold::DaySpecific(table.clone()))
                .ok_or_else(|| ProcessingError::StationNotFound {
                    station: station.to_string(),
                }),
        }
    }

    /// Short tag used in default output filenames
    pub fn tag(&self) -> String {
        match self {
            ThresholdSet::Fixed(value) => format!("th_{}", value),
            ThresholdSet::Shared(_) | ThresholdSet::PerStation(_) => "th_daily".to_string(),
        }
    }
}

/// Which side of the threshold counts as an extreme day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// temperature >= threshold
    #[default]
    Heat,
    /// temperature <= threshold
    Cold,
}

impl Direction {
    pub fn is_extreme(&self, temperature: f64, threshold: f64) -> bool {
        match self {
            Direction::Heat => temperature >= threshold,
            Direction::Cold => temperature <= threshold,
        }
    }

    pub fn wave_name(&self) -> &'static str {
        match self {
            Direction::Heat => "heatwave",
            Direction::Cold => "coldwave",
        }
    }

    /// Season a date belongs to, keyed by the year the season starts in.
    ///
    /// Heat seasons are calendar years. Cold seasons run from October to
    /// September so that one winter is never cut at New Year.
    pub fn season_of(&self, date: NaiveDate) -> i32 {
        match self {
            Direction::Heat => date.year(),
            Direction::Cold if date.month() >= COLD_SEASON_START_MONTH => date.year(),
            Direction::Cold => date.year() - 1,
        }
    }

    /// "2023" for heat seasons, "2022/23" for winters
    pub fn season_label(&self, season: i32) -> String {
        match self {
            Direction::Heat => season.to_string(),
            Direction::Cold => format!("{}/{:02}", season, (season + 1).rem_euclid(100)),
        }
    }
}

impl FromStr for Direction {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "heat" => Ok(Direction::Heat),
            "cold" => Ok(Direction::Cold),
            _ => Err(ProcessingError::Config(format!("Unknown direction: {}", s))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Heat => write!(f, "heat"),
            Direction::Cold => write!(f, "cold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_day_validation() {
        assert!(CalendarDay::new(2, 29).is_ok());
        assert!(CalendarDay::new(2, 30).is_err());
        assert!(CalendarDay::new(13, 1).is_err());
        assert_eq!(CalendarDay::new(7, 4).unwrap().to_string(), "07-04");
    }

    #[test]
    fn test_duplicate_day_rejected() {
        let mut table = DayThresholds::new();
        let day = CalendarDay::new(7, 1).unwrap();
        table.insert(day, 25.0).unwrap();
        assert!(table.insert(day, 26.0).is_err());
    }

    #[test]
    fn test_threshold_lookup() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        assert_eq!(Threshold::Fixed(27.0).value_for(date), Some(27.0));

        let table: DayThresholds = [(CalendarDay::new(7, 1).unwrap(), 24.5)].into_iter().collect();
        let threshold = Threshold::DaySpecific(table);
        assert_eq!(threshold.value_for(date), Some(24.5));
        assert_eq!(threshold.value_for(date.succ_opt().unwrap()), None);
    }

    #[test]
    fn test_per_station_lookup() {
        let mut tables = HashMap::new();
        tables.insert("Tartu".to_string(), DayThresholds::new());
        let set = ThresholdSet::PerStation(tables);

        assert!(set.for_station("Tartu").is_ok());
        assert!(matches!(
            set.for_station("Pärnu"),
            Err(ProcessingError::StationNotFound { .. })
        ));
        assert_eq!(set.tag(), "th_daily");
        assert_eq!(ThresholdSet::Fixed(-15.0).tag(), "th_-15");
    }

    #[test]
    fn test_direction() {
        assert!(Direction::Heat.is_extreme(27.0, 27.0));
        assert!(!Direction::Heat.is_extreme(26.9, 27.0));
        assert!(Direction::Cold.is_extreme(-15.0, -15.0));
        assert!(!Direction::Cold.is_extreme(-14.0, -15.0));
        assert_eq!("COLD".parse::<Direction>().unwrap(), Direction::Cold);
        assert!("warm".parse::<Direction>().is_err());
    }

    #[test]
    fn test_seasons() {
        let new_year = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let autumn = NaiveDate::from_ymd_opt(2022, 10, 1).unwrap();
        let summer = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();

        assert_eq!(Direction::Heat.season_of(new_year), 2023);
        assert_eq!(Direction::Cold.season_of(new_year), 2022);
        assert_eq!(Direction::Cold.season_of(autumn), 2022);
        assert_eq!(Direction::Cold.season_of(summer), 2022);

        assert_eq!(Direction::Heat.season_label(2023), "2023");
        assert_eq!(Direction::Cold.season_label(2022), "2022/23");
        assert_eq!(Direction::Cold.season_label(1999), "1999/00");
    }
}
