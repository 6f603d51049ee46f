//! Rain as two models: whether it rains, and how much it rains when it does.

use crate::features::table::FeatureTable;
use crate::model::error::ModelError;
use crate::model::forest::{RandomForestClassifier, RandomForestRegressor};
use crate::model::params::ForestParams;
use crate::model::{Predictor, ProbabilityModel};
use log::{debug, warn};

/// Rain amount to expect: `probability × magnitude`, with the probability clamped
/// to `[0, 1]`. Zero whenever the probability is zero.
///
/// ```
/// use meteocast::model::rain::expected_precipitation;
///
/// assert_eq!(expected_precipitation(0.5, 4.0), 2.0);
/// assert_eq!(expected_precipitation(0.0, 12.0), 0.0);
/// ```
pub fn expected_precipitation(probability: f64, magnitude: f64) -> f64 {
    let probability = probability.clamp(0.0, 1.0);
    if probability == 0.0 {
        0.0
    } else {
        probability * magnitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainEstimate {
    pub probability: f64,
    /// Amount predicted on the assumption that it rains.
    pub magnitude: f64,
    pub expected: f64,
}

/// A rain/no-rain classifier paired with an amount regressor trained only on
/// rainy rows.
#[derive(Debug, Clone)]
pub struct ConditionalRainModel {
    classifier: RandomForestClassifier,
    amount: Option<RandomForestRegressor>,
    threshold: f64,
}

impl ConditionalRainModel {
    /// Trains on `table`: rows with `precip_column > threshold` are rainy. When no row
    /// is rainy there is no amount model and every magnitude is zero.
    pub fn fit(
        table: &FeatureTable,
        precip_column: &str,
        threshold: f64,
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let x = table.matrix()?;
        let labels: Vec<bool> = table
            .column(precip_column)?
            .into_iter()
            .map(|v| v > threshold)
            .collect();
        let classifier = RandomForestClassifier::fit(&x, &labels, params)?;

        let rainy = table.filter_greater(precip_column, threshold)?;
        let amount = if rainy.is_empty() {
            warn!("No rows with {precip_column} > {threshold}, rain amount will be zero");
            None
        } else {
            debug!("Fitting rain amount on {} rainy rows", rainy.height());
            Some(RandomForestRegressor::fit(
                &rainy.matrix()?,
                &rainy.column(precip_column)?,
                params,
            )?)
        };
        Ok(Self {
            classifier,
            amount,
            threshold,
        })
    }

    pub fn estimate(&self, row: &[f64]) -> Result<RainEstimate, ModelError> {
        let probability = self.classifier.predict_proba(row)?;
        let magnitude = match &self.amount {
            Some(amount) => amount.predict(row)?,
            None => 0.0,
        };
        Ok(RainEstimate {
            probability,
            magnitude,
            expected: expected_precipitation(probability, magnitude),
        })
    }

    pub fn classifier(&self) -> &RandomForestClassifier {
        &self.classifier
    }

    pub fn amount(&self) -> Option<&RandomForestRegressor> {
        self.amount.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Predicts the expected rain amount.
impl Predictor for ConditionalRainModel {
    fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        Ok(self.estimate(row)?.expected)
    }
}

/// Predicts the rain amount assuming it rains, ignoring the probability.
#[derive(Debug, Clone, Copy)]
pub struct RainMagnitude<'a>(pub &'a ConditionalRainModel);

impl Predictor for RainMagnitude<'_> {
    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        Ok(self.0.estimate(row)?.magnitude)
    }
}

impl ProbabilityModel for ConditionalRainModel {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.classifier.predict_proba(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::builder::build_features;
    use crate::features::feature_set::{FeatureSet, LagSpec};
    use crate::types::frequency::Frequency;
    use crate::types::observation_frame::ObservationFrame;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, NaiveDate};

    fn rain_table(precip: Vec<f64>) -> FeatureTable {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let times = (0..precip.len() as i64).map(|i| start + Duration::days(i)).collect();
        let frame = ObservationFrame::from_columns(
            Frequency::Daily,
            times,
            vec![(
                "precip_sum".to_string(),
                precip.into_iter().map(Some).collect(),
            )],
        )
        .unwrap();
        let features = FeatureSet {
            lags: vec![LagSpec {
                column: "precip_sum".to_string(),
                max_lag: 1,
            }],
            excluded: vec!["precip_sum".to_string()],
            ..Default::default()
        };
        build_features(&frame, &features).unwrap()
    }

    fn params() -> ForestParams {
        ForestParams::builder().n_trees(20).build()
    }

    #[test]
    fn test_expected_precipitation() {
        assert_eq!(expected_precipitation(0.25, 8.0), 2.0);
        assert_eq!(expected_precipitation(0.0, f64::INFINITY), 0.0);
        assert_eq!(expected_precipitation(1.5, 3.0), 3.0);
        assert_eq!(expected_precipitation(-0.2, 3.0), 0.0);
    }

    #[test]
    fn test_dry_history_has_no_amount_model() {
        let model = ConditionalRainModel::fit(&rain_table(vec![0.0; 30]), "precip_sum", 0.1, &params())
            .unwrap();
        assert!(model.amount().is_none());
        let estimate = model.estimate(&[0.0]).unwrap();
        assert_eq!(estimate.probability, 0.0);
        assert_eq!(estimate.magnitude, 0.0);
        assert_eq!(estimate.expected, 0.0);
    }

    #[test]
    fn test_estimate_combines_probability_and_amount() {
        // Rain follows a dry day, a dry day follows rain.
        let precip: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 0.0 } else { 4.0 }).collect();
        let model =
            ConditionalRainModel::fit(&rain_table(precip), "precip_sum", 0.1, &params()).unwrap();
        assert!(model.amount().is_some());

        let after_dry = model.estimate(&[0.0]).unwrap();
        assert!(after_dry.probability > 0.9);
        assert_abs_diff_eq!(after_dry.magnitude, 4.0);
        assert_abs_diff_eq!(
            after_dry.expected,
            after_dry.probability * after_dry.magnitude
        );

        let after_rain = model.estimate(&[4.0]).unwrap();
        assert!(after_rain.probability < 0.1);
        assert_abs_diff_eq!(model.predict(&[4.0]).unwrap(), after_rain.expected);
    }
}
