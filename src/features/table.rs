//! Contains the `FeatureTable`: complete feature rows ready for model fitting.

use crate::features::error::FeatureError;
use crate::types::observation_frame::{from_millis, TIME_COLUMN};
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Feature rows with every lag and rolling reference resolved.
///
/// Holds the `time` column, the model input columns (see [`Self::feature_names`])
/// and the target columns. Rows are in chronological order.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    frame: DataFrame,
    times: Vec<NaiveDateTime>,
    feature_names: Vec<String>,
}

impl FeatureTable {
    pub(crate) fn new(frame: DataFrame, feature_names: Vec<String>) -> Result<Self, FeatureError> {
        let millis = frame.column(TIME_COLUMN)?.cast(&DataType::Int64)?;
        let times = millis
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, millis)| {
                let millis = millis.ok_or_else(|| FeatureError::NullValue {
                    column: TIME_COLUMN.to_string(),
                    row,
                })?;
                from_millis(millis).ok_or(FeatureError::InvalidTime(millis))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frame,
            times,
            feature_names,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// Model input columns, in the order rows are laid out by [`Self::matrix`].
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Position of a model input column inside a feature row.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|f| f == name)
    }

    /// All values of one column.
    pub fn column(&self, name: &str) -> Result<Vec<f64>, FeatureError> {
        let values = self
            .frame
            .column(name)
            .map_err(|_| FeatureError::UnknownColumn(name.to_string()))?
            .f64()?;
        values
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| FeatureError::NullValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Row-major model inputs.
    pub fn matrix(&self) -> Result<Vec<Vec<f64>>, FeatureError> {
        let columns = self
            .feature_names
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((0..self.height())
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect())
    }

    /// Model inputs of one row.
    pub fn row(&self, row: usize) -> Result<Vec<f64>, FeatureError> {
        if row >= self.height() {
            return Err(FeatureError::RowOutOfBounds {
                row,
                height: self.height(),
            });
        }
        self.feature_names
            .iter()
            .map(|name| {
                self.frame
                    .column(name)
                    .map_err(|_| FeatureError::UnknownColumn(name.clone()))?
                    .f64()?
                    .get(row)
                    .ok_or_else(|| FeatureError::NullValue {
                        column: name.clone(),
                        row,
                    })
            })
            .collect()
    }

    /// Model inputs of the most recent row.
    pub fn last_row(&self) -> Result<Vec<f64>, FeatureError> {
        self.row(self.height().saturating_sub(1))
    }

    /// Splits on time: the last `floor(height * test_fraction)` rows become the test
    /// set and everything before them the training set.
    pub fn chronological_split(
        &self,
        test_fraction: f64,
    ) -> Result<(FeatureTable, FeatureTable), FeatureError> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(FeatureError::InvalidSplit(test_fraction));
        }
        let height = self.height();
        let test_len = (height as f64 * test_fraction).floor() as usize;
        let train_len = height - test_len;
        Ok((self.slice(0, train_len), self.slice(train_len, test_len)))
    }

    /// Rows where `column > threshold`.
    pub fn filter_greater(&self, column: &str, threshold: f64) -> Result<FeatureTable, FeatureError> {
        let values = self.column(column)?;
        let keep: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > threshold)
            .map(|(i, _)| i)
            .collect();
        let mask: BooleanChunked = values.iter().map(|v| *v > threshold).collect();
        let frame = self.frame.filter(&mask)?;
        Ok(Self {
            frame,
            times: keep.iter().map(|&i| self.times[i]).collect(),
            feature_names: self.feature_names.clone(),
        })
    }

    fn slice(&self, offset: usize, len: usize) -> FeatureTable {
        Self {
            frame: self.frame.slice(offset as i64, len),
            times: self.times[offset..offset + len].to_vec(),
            feature_names: self.feature_names.clone(),
        }
    }
}
