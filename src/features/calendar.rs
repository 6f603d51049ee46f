//! Calendar features: deterministic functions of a timestamp that need no history.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A calendar column a feature set may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarField {
    Hour,
    HourSin,
    HourCos,
    DayOfYear,
    Month,
}

impl CalendarField {
    pub fn column(&self) -> &'static str {
        match self {
            CalendarField::Hour => "hour",
            CalendarField::HourSin => "hour_sin",
            CalendarField::HourCos => "hour_cos",
            CalendarField::DayOfYear => "dayofyear",
            CalendarField::Month => "month",
        }
    }
}

/// Calendar features of a single timestamp.
///
/// # Examples
///
/// ```
/// use meteocast::CalendarFeatures;
/// use chrono::NaiveDate;
///
/// let six_am = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let features = CalendarFeatures::at(six_am);
/// assert_eq!(features.hour_sin, 1.0);
/// assert!(features.hour_cos.abs() < 1e-12);
/// assert_eq!(features.day_of_year, 32.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    pub hour: f64,
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub day_of_year: f64,
    pub month: f64,
}

impl CalendarFeatures {
    pub fn at(time: NaiveDateTime) -> Self {
        let hour = time.hour();
        let angle = 2.0 * PI * f64::from(hour) / 24.0;
        Self {
            hour: f64::from(hour),
            hour_sin: angle.sin(),
            hour_cos: angle.cos(),
            day_of_year: f64::from(time.ordinal()),
            month: f64::from(time.month()),
        }
    }

    pub fn get(&self, field: CalendarField) -> f64 {
        match field {
            CalendarField::Hour => self.hour,
            CalendarField::HourSin => self.hour_sin,
            CalendarField::HourCos => self.hour_cos,
            CalendarField::DayOfYear => self.day_of_year,
            CalendarField::Month => self.month,
        }
    }
}
