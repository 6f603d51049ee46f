//! Defines the time granularity of archive observations and everything derived from it:
//! the archive API block name and the length of one forecasting step.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the time frequency or granularity of archive weather data.
///
/// Used to pick the block of the archive API response (`"hourly"` or `"daily"`)
/// and to advance the forecaster by one time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One record per hour.
    Hourly,
    /// One aggregated record per day.
    Daily,
}

impl Frequency {
    /// Name of the query parameter and of the response block in the archive API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
        }
    }

    /// Length of one time unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteocast::Frequency;
    /// use chrono::Duration;
    ///
    /// assert_eq!(Frequency::Hourly.step(), Duration::hours(1));
    /// assert_eq!(Frequency::Daily.step(), Duration::days(1));
    /// ```
    pub fn step(&self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
            Frequency::Daily => Duration::days(1),
        }
    }

    /// Format of the `time` array entries returned by the archive API.
    pub(crate) fn time_format(&self) -> &'static str {
        match self {
            Frequency::Hourly => "%Y-%m-%dT%H:%M",
            Frequency::Daily => "%Y-%m-%d",
        }
    }
}

/// Allows formatting a `Frequency` variant using its `path_segment`.
///
/// # Examples
///
/// ```
/// use meteocast::Frequency;
///
/// assert_eq!(format!("{}", Frequency::Hourly), "hourly");
/// assert_eq!(Frequency::Daily.to_string(), "daily");
/// ```
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
