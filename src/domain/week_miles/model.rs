//! Week miles aggregate

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMilesSummary {
    pub unit_number: String,
    /// Always a Sunday
    pub week_start: NaiveDate,
    pub total_miles: f64,
    pub trip_count: u32,
}

impl WeekMilesSummary {
    pub fn empty(unit_number: impl Into<String>, week_start: NaiveDate) -> Self {
        Self {
            unit_number: unit_number.into(),
            week_start,
            total_miles: 0.0,
            trip_count: 0,
        }
    }

    pub fn add_trip(&mut self, miles: f64) {
        self.total_miles += miles;
        self.trip_count += 1;
    }
}

/// Sunday on or before `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday();
    date - Duration::days(i64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-03-10 is a Sunday
        assert_eq!(week_start_of(d(2024, 3, 10)), d(2024, 3, 10));
        assert_eq!(week_start_of(d(2024, 3, 13)), d(2024, 3, 10));
        assert_eq!(week_start_of(d(2024, 3, 16)), d(2024, 3, 10));
        assert_eq!(week_start_of(d(2024, 3, 17)), d(2024, 3, 17));
    }

    #[test]
    fn week_start_crosses_month_boundary() {
        assert_eq!(week_start_of(d(2024, 3, 1)), d(2024, 2, 25));
    }

    #[test]
    fn add_trip_accumulates() {
        let mut summary = WeekMilesSummary::empty("T-100", d(2024, 3, 10));
        summary.add_trip(120.5);
        summary.add_trip(79.5);
        assert_eq!(summary.total_miles, 200.0);
        assert_eq!(summary.trip_count, 2);
    }
}
