//! Multi-step forecasting by feeding one-step predictions back in as history.

use crate::features::builder::build_features;
use crate::features::calendar::CalendarFeatures;
use crate::features::feature_set::FeatureSet;
use crate::forecast::error::ForecastError;
use crate::model::Predictor;
use crate::types::observation_frame::ObservationFrame;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How lag and rolling features of a forecast step are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LagPolicy {
    /// Rebuild every feature from the history extended with earlier predictions,
    /// through the same code path used for training.
    #[default]
    Recompute,
    /// Reuse the lag and rolling values of the last observed feature row for every
    /// step; only calendar features move forward.
    CarryForward,
}

impl fmt::Display for LagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LagPolicy::Recompute => "recompute",
            LagPolicy::CarryForward => "carry-forward",
        })
    }
}

impl FromStr for LagPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recompute" => Ok(LagPolicy::Recompute),
            "carry-forward" => Ok(LagPolicy::CarryForward),
            other => Err(ForecastError::UnknownLagPolicy(other.to_string())),
        }
    }
}

/// A model forecasting one output, optionally written back into an observation
/// column so later steps see it as history.
pub struct TargetModel<'a> {
    name: String,
    model: &'a dyn Predictor,
    writes: Option<String>,
    bounds: Option<(f64, f64)>,
}

impl<'a> TargetModel<'a> {
    pub fn new(name: impl Into<String>, model: &'a dyn Predictor) -> Self {
        Self {
            name: name.into(),
            model,
            writes: None,
            bounds: None,
        }
    }

    /// Stores each prediction in `column` of the synthetic observation row.
    pub fn writes(mut self, column: impl Into<String>) -> Self {
        self.writes = Some(column.into());
        self
    }

    /// Clamps each prediction to `[min, max]`.
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ForecastError> {
        let value = self.model.predict(row)?;
        Ok(match self.bounds {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        })
    }
}

/// Predicted outputs for one future timestamp, in target order.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastStep {
    pub time: NaiveDateTime,
    pub values: Vec<(String, f64)>,
}

impl ForecastStep {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

pub struct RecursiveForecaster<'a> {
    features: &'a FeatureSet,
    targets: Vec<TargetModel<'a>>,
    policy: LagPolicy,
}

impl<'a> RecursiveForecaster<'a> {
    pub fn new(features: &'a FeatureSet, targets: Vec<TargetModel<'a>>, policy: LagPolicy) -> Self {
        Self {
            features,
            targets,
            policy,
        }
    }

    /// Forecasts `horizon` steps after the last row of `history`.
    ///
    /// Step `k` is stamped `last + k * step`. Unpredicted measurements persist their
    /// last known value.
    ///
    /// # Errors
    ///
    /// [`ForecastError::ZeroHorizon`] and [`ForecastError::EmptyHistory`] on bad
    /// input; [`ForecastError::IncompleteHistory`] when the tail of `history` is too
    /// short or has gaps; model errors such as a feature width mismatch.
    pub fn forecast(
        &self,
        history: &ObservationFrame,
        horizon: usize,
    ) -> Result<Vec<ForecastStep>, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::ZeroHorizon);
        }
        let Some(last) = history.last_time() else {
            return Err(ForecastError::EmptyHistory);
        };
        debug!(
            "Forecasting {} steps after {} ({})",
            horizon, last, self.policy
        );
        match self.policy {
            LagPolicy::Recompute => self.recompute(history, last, horizon),
            LagPolicy::CarryForward => self.carry_forward(history, last, horizon),
        }
    }

    fn recompute(
        &self,
        history: &ObservationFrame,
        last: NaiveDateTime,
        horizon: usize,
    ) -> Result<Vec<ForecastStep>, ForecastError> {
        let window = self.features.max_window() + 1;
        let step = history.frequency().step();
        let mut working = history.tail(window);
        let mut cursor = last;
        let mut steps = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            cursor += step;
            let persisted = working.last_values()?;
            let provisional = working.push_row(cursor, &persisted)?;
            let table = build_features(&provisional.tail(window), self.features)?;
            if table.last_time() != Some(cursor) {
                return Err(ForecastError::IncompleteHistory(cursor));
            }
            let row = table.last_row()?;
            let values = self.predict_all(&row)?;

            let mut observed = persisted;
            for (target, (_, value)) in self.targets.iter().zip(&values) {
                let Some(column) = &target.writes else {
                    continue;
                };
                if let Some(index) = working.columns().iter().position(|c| c == column) {
                    observed[index] = Some(*value);
                }
            }
            working = working.push_row(cursor, &observed)?.tail(window);
            steps.push(ForecastStep {
                time: cursor,
                values,
            });
        }
        Ok(steps)
    }

    fn carry_forward(
        &self,
        history: &ObservationFrame,
        last: NaiveDateTime,
        horizon: usize,
    ) -> Result<Vec<ForecastStep>, ForecastError> {
        let table = build_features(&history.tail(self.features.max_window() + 1), self.features)?;
        if table.last_time() != Some(last) {
            return Err(ForecastError::IncompleteHistory(last));
        }
        let base = table.last_row()?;
        let calendar: Vec<_> = self
            .features
            .calendar
            .iter()
            .filter_map(|field| table.feature_index(field.column()).map(|i| (i, *field)))
            .collect();

        let step = history.frequency().step();
        let mut cursor = last;
        let mut steps = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            cursor += step;
            let now = CalendarFeatures::at(cursor);
            let mut row = base.clone();
            for (index, field) in &calendar {
                row[*index] = now.get(*field);
            }
            steps.push(ForecastStep {
                time: cursor,
                values: self.predict_all(&row)?,
            });
        }
        Ok(steps)
    }

    fn predict_all(&self, row: &[f64]) -> Result<Vec<(String, f64)>, ForecastError> {
        self.targets
            .iter()
            .map(|target| Ok((target.name.clone(), target.predict(row)?)))
            .collect()
    }
}
