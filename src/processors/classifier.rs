use crate::error::{ProcessingError, Result};
use crate::models::{DailyRecord, Direction, Threshold};
use chrono::{Datelike, NaiveDate};

/// One day after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedDay {
    pub date: NaiveDate,
    pub is_heat: bool,
}

/// Labels days against the threshold of one station
pub struct HeatDayClassifier<'a> {
    station: &'a str,
    threshold: &'a Threshold,
    direction: Direction,
}

impl<'a> HeatDayClassifier<'a> {
    pub fn new(station: &'a str, threshold: &'a Threshold) -> Self {
        Self {
            station,
            threshold,
            direction: Direction::Heat,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn is_heat_day(&self, record: &DailyRecord) -> Result<bool> {
        let threshold = self.threshold.value_for(record.date).ok_or_else(|| {
            ProcessingError::MissingThreshold {
                station: self.station.to_string(),
                month: record.date.month(),
                day: record.date.day(),
            }
        })?;

        Ok(self.direction.is_extreme(record.temperature, threshold))
    }

    pub fn classify(&self, records: &[DailyRecord]) -> Result<Vec<ClassifiedDay>> {
        records
            .iter()
            .map(|record| {
                Ok(ClassifiedDay {
                    date: record.date,
                    is_heat: self.is_heat_day(record)?,
                })
            })
            .collect()
    }
}
