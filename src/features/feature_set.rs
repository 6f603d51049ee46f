//! The feature recipe: which lags, rolling means, derived flags and calendar columns
//! to build from an observation frame, and which columns are prediction targets.

use crate::features::calendar::CalendarField;
use serde::{Deserialize, Serialize};

/// Lagged copies `{column}_lag1` through `{column}_lag{max_lag}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagSpec {
    pub column: String,
    pub max_lag: usize,
}

/// Moving mean `{column}_roll{window}` over the current row and the `window - 1`
/// rows before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingSpec {
    pub column: String,
    pub window: usize,
}

/// A column computed row by row from measurement columns before lags are taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedColumn {
    /// 1.0 when `source > threshold`, otherwise 0.0 (missing counts as 0.0).
    RainFlag {
        source: String,
        threshold: f64,
        name: String,
    },
    /// Arithmetic mean of two columns.
    Mean { a: String, b: String, name: String },
}

impl DerivedColumn {
    pub fn name(&self) -> &str {
        match self {
            DerivedColumn::RainFlag { name, .. } | DerivedColumn::Mean { name, .. } => name,
        }
    }

    pub(crate) fn sources(&self) -> Vec<&str> {
        match self {
            DerivedColumn::RainFlag { source, .. } => vec![source.as_str()],
            DerivedColumn::Mean { a, b, .. } => vec![a.as_str(), b.as_str()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    pub derived: Vec<DerivedColumn>,
    pub lags: Vec<LagSpec>,
    pub rolling: Vec<RollingSpec>,
    pub calendar: Vec<CalendarField>,
    /// Columns kept in the feature table (as targets) but never fed to a model.
    pub excluded: Vec<String>,
}

pub const DAILY_RAIN_THRESHOLD: f64 = 0.1;
pub const HOURLY_RAIN_THRESHOLD: f64 = 0.05;

impl FeatureSet {
    /// Number of leading rows that cannot have a complete feature row.
    pub fn max_window(&self) -> usize {
        let lag = self.lags.iter().map(|l| l.max_lag).max().unwrap_or(0);
        let rolling = self
            .rolling
            .iter()
            .map(|r| r.window.saturating_sub(1))
            .max()
            .unwrap_or(0);
        lag.max(rolling)
    }

    pub fn lag_name(column: &str, lag: usize) -> String {
        format!("{column}_lag{lag}")
    }

    pub fn rolling_name(column: &str, window: usize) -> String {
        format!("{column}_roll{window}")
    }

    pub fn is_excluded(&self, column: &str) -> bool {
        self.excluded.iter().any(|c| c == column)
    }

    /// Model input columns for observations with the given measurement columns, in
    /// table order: measurements, derived, lags, rolling means, calendar.
    pub fn feature_names(&self, measurements: &[String]) -> Vec<String> {
        let derived: Vec<String> = self.derived.iter().map(|d| d.name().to_string()).collect();
        let mut names: Vec<String> = measurements
            .iter()
            .chain(derived.iter())
            .filter(|c| !self.is_excluded(c))
            .cloned()
            .collect();
        for lag in &self.lags {
            names.extend((1..=lag.max_lag).map(|k| Self::lag_name(&lag.column, k)));
        }
        for rolling in &self.rolling {
            names.push(Self::rolling_name(&rolling.column, rolling.window));
        }
        names.extend(self.calendar.iter().map(|c| c.column().to_string()));
        names
    }

    /// Next-day max/min temperature from a week of history.
    pub fn daily_temperature() -> Self {
        Self {
            derived: vec![],
            lags: lags(&["temp_max", "temp_min", "precip_sum"], 7),
            rolling: rolling(&[("temp_max", 7), ("temp_min", 7)]),
            calendar: vec![CalendarField::DayOfYear, CalendarField::Month],
            excluded: strings(&["temp_max", "temp_min"]),
        }
    }

    /// Next-hour temperature from a day of history with a cyclic hour encoding.
    pub fn hourly_temperature() -> Self {
        Self {
            derived: vec![],
            lags: lags(&["temp", "humidity", "cloud", "precip"], 24),
            rolling: rolling(&[("temp", 6), ("temp", 24)]),
            calendar: vec![
                CalendarField::Hour,
                CalendarField::DayOfYear,
                CalendarField::Month,
                CalendarField::HourSin,
                CalendarField::HourCos,
            ],
            excluded: strings(&["temp"]),
        }
    }

    /// Rain probability, rain amount, wind and cloud cover for the next day.
    pub fn daily_precipitation() -> Self {
        Self {
            derived: vec![
                DerivedColumn::RainFlag {
                    source: "precip_sum".to_string(),
                    threshold: DAILY_RAIN_THRESHOLD,
                    name: "rain_flag".to_string(),
                },
                DerivedColumn::Mean {
                    a: "temp_max".to_string(),
                    b: "temp_min".to_string(),
                    name: "temp_mean".to_string(),
                },
            ],
            lags: lags(
                &[
                    "precip_sum",
                    "rain_flag",
                    "temp_max",
                    "temp_min",
                    "cloudcover",
                    "humidity",
                    "wind_max",
                ],
                7,
            ),
            rolling: rolling(&[
                ("precip_sum", 3),
                ("precip_sum", 7),
                ("temp_mean", 7),
                ("wind_max", 3),
                ("cloudcover", 3),
            ]),
            calendar: vec![CalendarField::Month, CalendarField::DayOfYear],
            excluded: strings(&["precip_sum", "rain_sum", "rain_flag", "cloudcover", "wind_max"]),
        }
    }

    /// Rain probability, rain amount, wind and cloud cover for the next hours.
    pub fn hourly_precipitation() -> Self {
        Self {
            derived: vec![DerivedColumn::RainFlag {
                source: "precip".to_string(),
                threshold: HOURLY_RAIN_THRESHOLD,
                name: "rain_flag".to_string(),
            }],
            lags: lags(&["precip", "rain_flag", "temp", "cloud", "humidity", "wind"], 5),
            rolling: rolling(&[("precip", 6), ("precip", 12), ("wind", 6), ("cloud", 6)]),
            calendar: vec![CalendarField::Hour, CalendarField::DayOfYear],
            excluded: strings(&["precip", "rain_flag", "wind", "cloud"]),
        }
    }
}

fn lags(columns: &[&str], max_lag: usize) -> Vec<LagSpec> {
    columns
        .iter()
        .map(|c| LagSpec {
            column: c.to_string(),
            max_lag,
        })
        .collect()
}

fn rolling(specs: &[(&str, usize)]) -> Vec<RollingSpec> {
    specs
        .iter()
        .map(|(c, window)| RollingSpec {
            column: c.to_string(),
            window: *window,
        })
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
