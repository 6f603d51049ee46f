//! Contains the `ObservationFrame` structure holding time-indexed archive observations.

use crate::types::frequency::Frequency;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

/// Name of the time column. A naive millisecond `Datetime` of the location's wall
/// clock, so calendar features match the local day.
pub const TIME_COLUMN: &str = "time";

/// Data type of [`TIME_COLUMN`].
pub const TIME_DTYPE: DataType = DataType::Datetime(TimeUnit::Milliseconds, None);

/// A wrapper around a Polars `DataFrame` holding one row per timestamp and one
/// `Float64` column per measured variable.
///
/// Time values are unique and strictly increasing: the constructors sort the rows
/// and keep the first of any duplicated timestamps. Missing measurements are nulls.
///
/// The frame is never mutated once built. The recursive forecaster extends a copy
/// with [`ObservationFrame::push_row`].
#[derive(Debug, Clone)]
pub struct ObservationFrame {
    frame: DataFrame,
    times: Vec<NaiveDateTime>,
    columns: Vec<String>,
    frequency: Frequency,
}

impl ObservationFrame {
    /// Builds a frame from a time array and parallel measurement arrays.
    ///
    /// # Errors
    ///
    /// Returns [`PolarsError::ShapeMismatch`] if any measurement array is not as
    /// long as `times`.
    pub fn from_columns(
        frequency: Frequency,
        times: Vec<NaiveDateTime>,
        series: Vec<(String, Vec<Option<f64>>)>,
    ) -> PolarsResult<Self> {
        for (name, values) in &series {
            if values.len() != times.len() {
                return Err(PolarsError::ShapeMismatch(
                    format!(
                        "column '{}' has {} values but there are {} timestamps",
                        name,
                        values.len(),
                        times.len()
                    )
                    .into(),
                ));
            }
        }

        // Stable sort, so dedup keeps the first occurrence of a timestamp.
        let mut order: Vec<usize> = (0..times.len()).collect();
        order.sort_by_key(|&i| times[i]);
        order.dedup_by_key(|i| times[*i]);

        let sorted_times: Vec<NaiveDateTime> = order.iter().map(|&i| times[i]).collect();
        let columns: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();
        let sorted_series: Vec<Vec<Option<f64>>> = series
            .iter()
            .map(|(_, values)| order.iter().map(|&i| values[i]).collect())
            .collect();

        let frame = build_frame(&columns, &sorted_times, &sorted_series)?;
        Ok(Self {
            frame,
            times: sorted_times,
            columns,
            frequency,
        })
    }

    /// The underlying Polars frame: a `time` column followed by the measurement columns.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Names of the measurement columns, in frame order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn height(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// All values of one measurement column.
    pub fn values(&self, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        Ok(self.frame.column(column)?.f64()?.into_iter().collect())
    }

    /// The most recent value of every measurement column, in [`Self::columns`] order.
    pub fn last_values(&self) -> PolarsResult<Vec<Option<f64>>> {
        let Some(last) = self.times.len().checked_sub(1) else {
            return Ok(vec![None; self.columns.len()]);
        };
        self.columns
            .iter()
            .map(|name| Ok(self.frame.column(name)?.f64()?.get(last)))
            .collect()
    }

    /// The last `n` rows (or all rows if there are fewer).
    pub fn tail(&self, n: usize) -> ObservationFrame {
        let start = self.times.len().saturating_sub(n);
        Self {
            frame: self.frame.tail(Some(n)),
            times: self.times[start..].to_vec(),
            columns: self.columns.clone(),
            frequency: self.frequency,
        }
    }

    /// Rows up to and including `time`.
    pub fn until(&self, time: NaiveDateTime) -> ObservationFrame {
        let len = self.times.partition_point(|t| *t <= time);
        Self {
            frame: self.frame.slice(0, len),
            times: self.times[..len].to_vec(),
            columns: self.columns.clone(),
            frequency: self.frequency,
        }
    }

    /// Returns a new frame with one row appended.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is not later than the last timestamp, or if
    /// `values` does not hold one entry per measurement column.
    pub fn push_row(&self, time: NaiveDateTime, values: &[Option<f64>]) -> PolarsResult<Self> {
        if let Some(last) = self.last_time() {
            if time <= last {
                return Err(PolarsError::ComputeError(
                    format!("appended row at {} is not after {}", time, last).into(),
                ));
            }
        }
        if values.len() != self.columns.len() {
            return Err(PolarsError::ShapeMismatch(
                format!(
                    "appended row has {} values for {} columns",
                    values.len(),
                    self.columns.len()
                )
                .into(),
            ));
        }

        let single: Vec<Vec<Option<f64>>> = values.iter().map(|v| vec![*v]).collect();
        let row = build_frame(&self.columns, &[time], &single)?;
        let frame = self.frame.vstack(&row)?;

        let mut times = self.times.clone();
        times.push(time);
        Ok(Self {
            frame,
            times,
            columns: self.columns.clone(),
            frequency: self.frequency,
        })
    }
}

pub(crate) fn to_millis(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

fn build_frame(
    columns: &[String],
    times: &[NaiveDateTime],
    series: &[Vec<Option<f64>>],
) -> PolarsResult<DataFrame> {
    let millis: Vec<i64> = times.iter().map(|t| to_millis(*t)).collect();
    let mut frame_columns = Vec::with_capacity(columns.len() + 1);
    frame_columns.push(Column::new(TIME_COLUMN.into(), millis).cast(&TIME_DTYPE)?);
    for (name, values) in columns.iter().zip(series) {
        frame_columns.push(Column::new(name.as_str().into(), values.clone()));
    }
    DataFrame::new(frame_columns)
}
