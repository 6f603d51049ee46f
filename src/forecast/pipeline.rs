//! The end-to-end forecasting runs: build features, split on time, train, score on
//! the held-out tail and forecast forward from the last complete observation.

use crate::features::builder::build_features;
use crate::features::feature_set::{FeatureSet, DAILY_RAIN_THRESHOLD, HOURLY_RAIN_THRESHOLD};
use crate::features::table::FeatureTable;
use crate::forecast::error::ForecastError;
use crate::forecast::recursive::{ForecastStep, LagPolicy, RecursiveForecaster, TargetModel};
use crate::model::forest::RandomForestRegressor;
use crate::model::metrics::{accuracy, mae, roc_auc, rmse};
use crate::model::params::ForestParams;
use crate::model::rain::{ConditionalRainModel, RainMagnitude};
use crate::model::{Predictor, ProbabilityModel, ProbabilityOf};
use crate::types::frequency::Frequency;
use crate::types::observation_frame::ObservationFrame;
use crate::types::variable::Variable;
use bon::Builder;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    DailyTemperature,
    HourlyTemperature,
    DailyPrecipitation,
    HourlyPrecipitation,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 4] = [
        PipelineKind::DailyTemperature,
        PipelineKind::HourlyTemperature,
        PipelineKind::DailyPrecipitation,
        PipelineKind::HourlyPrecipitation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineKind::DailyTemperature => "daily-temperature",
            PipelineKind::HourlyTemperature => "hourly-temperature",
            PipelineKind::DailyPrecipitation => "daily-precipitation",
            PipelineKind::HourlyPrecipitation => "hourly-precipitation",
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            PipelineKind::DailyTemperature | PipelineKind::DailyPrecipitation => Frequency::Daily,
            PipelineKind::HourlyTemperature | PipelineKind::HourlyPrecipitation => {
                Frequency::Hourly
            }
        }
    }

    pub fn feature_set(&self) -> FeatureSet {
        match self {
            PipelineKind::DailyTemperature => FeatureSet::daily_temperature(),
            PipelineKind::HourlyTemperature => FeatureSet::hourly_temperature(),
            PipelineKind::DailyPrecipitation => FeatureSet::daily_precipitation(),
            PipelineKind::HourlyPrecipitation => FeatureSet::hourly_precipitation(),
        }
    }

    /// Steps forecast when no horizon is configured. Hourly precipitation instead
    /// covers the whole next calendar day.
    pub fn default_horizon(&self) -> usize {
        match self.frequency() {
            Frequency::Daily => 1,
            Frequency::Hourly => 24,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ForecastError::UnknownKind(s.to_string()))
    }
}

/// Archive variables a pipeline needs.
pub fn default_variables(kind: PipelineKind) -> Vec<Variable> {
    match kind {
        PipelineKind::DailyTemperature => vec![
            Variable::TemperatureMax,
            Variable::TemperatureMin,
            Variable::PrecipitationSum,
        ],
        PipelineKind::HourlyTemperature => vec![
            Variable::Temperature,
            Variable::RelativeHumidity,
            Variable::CloudCover,
            Variable::Precipitation,
        ],
        PipelineKind::DailyPrecipitation => vec![
            Variable::TemperatureMax,
            Variable::TemperatureMin,
            Variable::PrecipitationSum,
            Variable::RainSum,
            Variable::CloudCoverMean,
            Variable::RelativeHumidityMean,
            Variable::WindSpeedMax,
        ],
        PipelineKind::HourlyPrecipitation => vec![
            Variable::Temperature,
            Variable::Precipitation,
            Variable::CloudCover,
            Variable::RelativeHumidity,
            Variable::WindSpeed,
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct PipelineConfig {
    /// Share of the most recent feature rows held out for scoring.
    #[builder(default = 0.2)]
    pub test_fraction: f64,
    #[builder(default)]
    pub forest: ForestParams,
    /// Forecast steps; `None` uses [`PipelineKind::default_horizon`].
    pub horizon: Option<usize>,
    #[builder(default)]
    pub lag_policy: LagPolicy,
    /// Retrain on every complete row, test split included, before forecasting.
    /// Scores always come from the models trained on the training split.
    #[builder(default = true)]
    pub refit: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Error of one regression target on the test split. `None` when there were no
/// test rows to score.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionScore {
    pub target: String,
    pub test_rows: usize,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
}

/// Actual and predicted values of one target over the test split.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutSeries {
    pub target: String,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

impl HoldoutSeries {
    pub fn score(&self) -> RegressionScore {
        RegressionScore {
            target: self.target.clone(),
            test_rows: self.actual.len(),
            mae: mae(&self.actual, &self.predicted),
            rmse: rmse(&self.actual, &self.predicted),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierScore {
    pub test_rows: usize,
    pub accuracy: Option<f64>,
    /// `None` when the test split holds only one class.
    pub roc_auc: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TemperatureReport {
    pub kind: PipelineKind,
    pub train_rows: usize,
    pub test_rows: usize,
    pub scores: Vec<RegressionScore>,
    /// Times of the test rows, shared by every holdout series.
    pub test_times: Vec<NaiveDateTime>,
    /// One series per target, in the order of `scores`.
    pub holdout: Vec<HoldoutSeries>,
    pub forecast: Vec<ForecastStep>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationForecast {
    pub time: NaiveDateTime,
    /// Chance of rain in `[0, 1]`.
    pub rain_probability: f64,
    /// Probability-weighted rain amount.
    pub rain_mm: f64,
    /// Amount predicted on the assumption that it rains.
    pub rain_mm_raw: f64,
    pub wind: f64,
    /// Cloud cover in percent, clamped to `[0, 100]`.
    pub cloud: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationSummary {
    pub mean_rain_probability: f64,
    pub total_rain_mm: f64,
    pub mean_wind: f64,
    pub mean_cloud: f64,
}

impl PrecipitationSummary {
    pub fn of(forecast: &[PrecipitationForecast]) -> Self {
        let n = forecast.len().max(1) as f64;
        let sum = |f: fn(&PrecipitationForecast) -> f64| forecast.iter().map(f).sum::<f64>();
        Self {
            mean_rain_probability: sum(|p| p.rain_probability) / n,
            total_rain_mm: sum(|p| p.rain_mm),
            mean_wind: sum(|p| p.wind) / n,
            mean_cloud: sum(|p| p.cloud) / n,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrecipitationReport {
    pub kind: PipelineKind,
    pub train_rows: usize,
    pub test_rows: usize,
    pub classifier: ClassifierScore,
    /// Scored on rainy test rows only; `None` when the test split has none or no
    /// amount model could be trained.
    pub rain_amount: Option<RegressionScore>,
    pub forecast: Vec<PrecipitationForecast>,
    pub summary: PrecipitationSummary,
    /// The last observed days, for daily runs.
    pub recent: Option<ObservationFrame>,
}

/// The report of any pipeline.
#[derive(Debug, Clone)]
pub enum ForecastReport {
    Temperature(TemperatureReport),
    Precipitation(PrecipitationReport),
}

impl ForecastReport {
    pub fn kind(&self) -> PipelineKind {
        match self {
            ForecastReport::Temperature(report) => report.kind,
            ForecastReport::Precipitation(report) => report.kind,
        }
    }
}

/// Runs the pipeline of `kind` on observations fetched with [`default_variables`].
pub fn run(
    kind: PipelineKind,
    observations: &ObservationFrame,
    config: &PipelineConfig,
) -> Result<ForecastReport, ForecastError> {
    Ok(match kind {
        PipelineKind::DailyTemperature => {
            ForecastReport::Temperature(daily_temperature(observations, config)?)
        }
        PipelineKind::HourlyTemperature => {
            ForecastReport::Temperature(hourly_temperature(observations, config)?)
        }
        PipelineKind::DailyPrecipitation => {
            ForecastReport::Precipitation(daily_precipitation(observations, config)?)
        }
        PipelineKind::HourlyPrecipitation => {
            ForecastReport::Precipitation(hourly_precipitation(observations, config)?)
        }
    })
}

/// Next-day maximum and minimum temperature.
pub fn daily_temperature(
    observations: &ObservationFrame,
    config: &PipelineConfig,
) -> Result<TemperatureReport, ForecastError> {
    temperature(
        PipelineKind::DailyTemperature,
        observations,
        config,
        &["temp_max", "temp_min"],
    )
}

/// Hour-by-hour temperature for the next day.
pub fn hourly_temperature(
    observations: &ObservationFrame,
    config: &PipelineConfig,
) -> Result<TemperatureReport, ForecastError> {
    temperature(PipelineKind::HourlyTemperature, observations, config, &["temp"])
}

/// Rain chance, rain amount, maximum wind and mean cloud cover for the next day.
pub fn daily_precipitation(
    observations: &ObservationFrame,
    config: &PipelineConfig,
) -> Result<PrecipitationReport, ForecastError> {
    precipitation(
        PipelineKind::DailyPrecipitation,
        observations,
        config,
        PrecipitationColumns {
            precip: "precip_sum",
            wind: "wind_max",
            cloud: "cloudcover",
            threshold: DAILY_RAIN_THRESHOLD,
        },
    )
}

/// Rain chance, rain amount, wind and cloud cover for every hour of the next day.
pub fn hourly_precipitation(
    observations: &ObservationFrame,
    config: &PipelineConfig,
) -> Result<PrecipitationReport, ForecastError> {
    precipitation(
        PipelineKind::HourlyPrecipitation,
        observations,
        config,
        PrecipitationColumns {
            precip: "precip",
            wind: "wind",
            cloud: "cloud",
            threshold: HOURLY_RAIN_THRESHOLD,
        },
    )
}

struct Prepared {
    /// Every complete feature row.
    all: FeatureTable,
    train: FeatureTable,
    test: FeatureTable,
    /// Observations up to the last complete feature row.
    seed: ObservationFrame,
}

fn prepare(
    observations: &ObservationFrame,
    features: &FeatureSet,
    config: &PipelineConfig,
) -> Result<Prepared, ForecastError> {
    let table = build_features(observations, features)?;
    let (train, test) = table.chronological_split(config.test_fraction)?;
    let Some(last) = table.last_time().filter(|_| !train.is_empty()) else {
        return Err(ForecastError::InsufficientHistory {
            observations: observations.height(),
            required: features.max_window() + 1,
        });
    };
    info!(
        "{} feature rows from {} observations: {} train, {} test",
        table.height(),
        observations.height(),
        train.height(),
        test.height()
    );
    Ok(Prepared {
        seed: observations.until(last),
        all: table,
        train,
        test,
    })
}

fn holdout(
    model: &dyn Predictor,
    test: &FeatureTable,
    target: &str,
) -> Result<HoldoutSeries, ForecastError> {
    Ok(HoldoutSeries {
        target: target.to_string(),
        actual: test.column(target)?,
        predicted: model.predict_many(&test.matrix()?)?,
    })
}

fn fit_regressors(
    table: &FeatureTable,
    targets: &[&str],
    params: &ForestParams,
) -> Result<Vec<RandomForestRegressor>, ForecastError> {
    let x = table.matrix()?;
    targets
        .iter()
        .map(|target| {
            info!("Training {} model on {} rows", target, table.height());
            RandomForestRegressor::fit(&x, &table.column(target)?, params)
                .map_err(ForecastError::from)
        })
        .collect()
}

fn temperature(
    kind: PipelineKind,
    observations: &ObservationFrame,
    config: &PipelineConfig,
    targets: &[&str],
) -> Result<TemperatureReport, ForecastError> {
    let features = kind.feature_set();
    let data = prepare(observations, &features, config)?;

    let models = fit_regressors(&data.train, targets, &config.forest)?;
    let holdout = targets
        .iter()
        .zip(&models)
        .map(|(target, model)| holdout(model, &data.test, target))
        .collect::<Result<Vec<_>, _>>()?;
    let scores = holdout.iter().map(HoldoutSeries::score).collect();

    let models = if config.refit {
        fit_regressors(&data.all, targets, &config.forest)?
    } else {
        models
    };

    let forecaster = RecursiveForecaster::new(
        &features,
        targets
            .iter()
            .zip(&models)
            .map(|(target, model)| TargetModel::new(*target, model).writes(*target))
            .collect(),
        config.lag_policy,
    );
    let horizon = config.horizon.unwrap_or(kind.default_horizon());
    let forecast = forecaster.forecast(&data.seed, horizon)?;

    Ok(TemperatureReport {
        kind,
        train_rows: data.train.height(),
        test_rows: data.test.height(),
        scores,
        test_times: data.test.times().to_vec(),
        holdout,
        forecast,
    })
}

struct PrecipitationColumns {
    precip: &'static str,
    wind: &'static str,
    cloud: &'static str,
    threshold: f64,
}

struct PrecipitationModels {
    rain: ConditionalRainModel,
    wind: RandomForestRegressor,
    cloud: RandomForestRegressor,
}

impl PrecipitationModels {
    fn fit(
        table: &FeatureTable,
        columns: &PrecipitationColumns,
        params: &ForestParams,
    ) -> Result<Self, ForecastError> {
        info!("Training rain models on {} rows", table.height());
        let rain = ConditionalRainModel::fit(table, columns.precip, columns.threshold, params)?;
        let x = table.matrix()?;
        info!("Training {} and {} models", columns.wind, columns.cloud);
        let wind = RandomForestRegressor::fit(&x, &table.column(columns.wind)?, params)?;
        let cloud = RandomForestRegressor::fit(&x, &table.column(columns.cloud)?, params)?;
        Ok(Self { rain, wind, cloud })
    }
}

fn precipitation(
    kind: PipelineKind,
    observations: &ObservationFrame,
    config: &PipelineConfig,
    columns: PrecipitationColumns,
) -> Result<PrecipitationReport, ForecastError> {
    let features = kind.feature_set();
    let data = prepare(observations, &features, config)?;
    let trained = PrecipitationModels::fit(&data.train, &columns, &config.forest)?;

    let test_x = data.test.matrix()?;
    let labels: Vec<bool> = data
        .test
        .column(columns.precip)?
        .into_iter()
        .map(|v| v > columns.threshold)
        .collect();
    let probabilities = trained.rain.predict_proba_many(&test_x)?;
    let predicted: Vec<bool> = probabilities.iter().map(|p| *p > 0.5).collect();
    let classifier = ClassifierScore {
        test_rows: data.test.height(),
        accuracy: accuracy(&labels, &predicted),
        roc_auc: roc_auc(&labels, &probabilities),
    };

    let rainy_test = data.test.filter_greater(columns.precip, columns.threshold)?;
    let rain_amount = match trained.rain.amount() {
        Some(amount) if !rainy_test.is_empty() => {
            Some(holdout(amount, &rainy_test, columns.precip)?.score())
        }
        _ => None,
    };

    let PrecipitationModels { rain, wind, cloud } = if config.refit {
        PrecipitationModels::fit(&data.all, &columns, &config.forest)?
    } else {
        trained
    };
    let probability = ProbabilityOf(&rain);
    let magnitude = RainMagnitude(&rain);
    let forecaster = RecursiveForecaster::new(
        &features,
        vec![
            TargetModel::new("rain_probability", &probability),
            TargetModel::new("rain_mm_raw", &magnitude),
            TargetModel::new("rain_mm", &rain).writes(columns.precip),
            TargetModel::new("wind", &wind).writes(columns.wind),
            TargetModel::new("cloud", &cloud)
                .writes(columns.cloud)
                .clamp(0.0, 100.0),
        ],
        config.lag_policy,
    );

    let (horizon, skip) = match (config.horizon, kind.frequency()) {
        (Some(horizon), _) => (horizon, 0),
        (None, Frequency::Hourly) => next_day_hours(data.seed.last_time()),
        (None, Frequency::Daily) => (kind.default_horizon(), 0),
    };
    let forecast: Vec<PrecipitationForecast> = forecaster
        .forecast(&data.seed, horizon)?
        .iter()
        .skip(skip)
        .map(precipitation_step)
        .collect();

    let recent = (kind.frequency() == Frequency::Daily).then(|| data.seed.tail(7));
    Ok(PrecipitationReport {
        kind,
        train_rows: data.train.height(),
        test_rows: data.test.height(),
        classifier,
        rain_amount,
        summary: PrecipitationSummary::of(&forecast),
        forecast,
        recent,
    })
}

/// Steps needed to reach the end of the calendar day after `last`, and how many of
/// the leading steps fall before its midnight.
fn next_day_hours(last: Option<NaiveDateTime>) -> (usize, usize) {
    let Some(last) = last else {
        return (24, 0);
    };
    let midnight = (last.date() + Duration::days(1)).and_time(NaiveTime::MIN);
    let lead = (midnight - last).num_hours().max(1) as usize;
    (lead - 1 + 24, lead - 1)
}

fn precipitation_step(step: &ForecastStep) -> PrecipitationForecast {
    let value = |name| step.get(name).unwrap_or(0.0);
    PrecipitationForecast {
        time: step.time,
        rain_probability: value("rain_probability"),
        rain_mm: value("rain_mm"),
        rain_mm_raw: value("rain_mm_raw"),
        wind: value("wind"),
        cloud: value("cloud"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig::builder()
            .forest(ForestParams::builder().n_trees(10).build())
            .build()
    }

    fn hourly_observations(hours: usize) -> ObservationFrame {
        let times = (0..hours).map(|i| at(1, 0) + Duration::hours(i as i64)).collect();
        let series = |f: fn(usize) -> f64| (0..hours).map(|i| Some(f(i))).collect::<Vec<_>>();
        ObservationFrame::from_columns(
            Frequency::Hourly,
            times,
            vec![
                ("temp".to_string(), series(|i| 5.0 + (i % 24) as f64 / 4.0)),
                ("precip".to_string(), series(|i| if i % 5 == 0 { 0.8 } else { 0.0 })),
                ("cloud".to_string(), series(|i| (i * 13 % 100) as f64)),
                ("humidity".to_string(), series(|i| 70.0 + (i % 10) as f64)),
                ("wind".to_string(), series(|i| 3.0 + (i % 7) as f64)),
            ],
        )
        .unwrap()
    }

    fn april(day: usize) -> NaiveDateTime {
        at(1, 0).with_month(4).unwrap() + Duration::days(day as i64)
    }

    /// Thirty April days of steadily warming weather, rain on every `rain_every`
    /// day when given.
    fn daily_observations(rain_every: Option<usize>) -> ObservationFrame {
        let days = 30;
        let times = (0..days).map(april).collect();
        let series = |f: &dyn Fn(usize) -> f64| (0..days).map(|i| Some(f(i))).collect::<Vec<_>>();
        let precip = |i: usize| match rain_every {
            Some(n) if i % n == 0 => 2.0,
            _ => 0.0,
        };
        ObservationFrame::from_columns(
            Frequency::Daily,
            times,
            vec![
                ("temp_max".to_string(), series(&|i| 10.0 + i as f64)),
                ("temp_min".to_string(), series(&|i| i as f64)),
                ("precip_sum".to_string(), series(&precip)),
                ("rain_sum".to_string(), series(&precip)),
                ("cloudcover".to_string(), series(&|i| (i * 17 % 100) as f64)),
                ("humidity".to_string(), series(&|i| 60.0 + (i % 9) as f64)),
                ("wind_max".to_string(), series(&|i| 4.0 + (i % 5) as f64)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_daily_temperature_tracks_recent_warming() {
        let report = daily_temperature(&daily_observations(None), &small_config()).unwrap();
        // Days 8 to 30 have a full week of history; the last 4 are held out.
        assert_eq!((report.train_rows, report.test_rows), (19, 4));
        assert_eq!(report.test_times.first(), Some(&april(26)));
        assert_eq!(report.holdout[0].target, "temp_max");
        assert_eq!(report.holdout[0].actual, vec![36.0, 37.0, 38.0, 39.0]);
        assert_eq!(report.holdout[0].predicted.len(), 4);
        assert!(report.scores.iter().all(|s| s.mae.is_some()));

        assert_eq!(report.forecast.len(), 1);
        let step = &report.forecast[0];
        assert_eq!(step.time, april(30));
        // Trained on every row, so the warmest days reach the forecast.
        let temp_max = step.get("temp_max").unwrap();
        assert!(temp_max > 36.0 && temp_max <= 39.0, "{temp_max}");
        let temp_min = step.get("temp_min").unwrap();
        assert!(temp_min > 26.0 && temp_min <= 29.0, "{temp_min}");
    }

    #[test]
    fn test_daily_temperature_without_refit_stays_in_training_split() {
        let config = PipelineConfig::builder()
            .forest(ForestParams::builder().n_trees(10).build())
            .refit(false)
            .build();
        let report = daily_temperature(&daily_observations(None), &config).unwrap();
        // The training split ends on a temp_max of 35.
        let temp_max = report.forecast[0].get("temp_max").unwrap();
        assert!(temp_max <= 35.0, "{temp_max}");
    }

    #[test]
    fn test_daily_precipitation_dry_month() {
        let report = daily_precipitation(&daily_observations(None), &small_config()).unwrap();
        assert_eq!(report.forecast.len(), 1);
        let step = report.forecast[0];
        assert_eq!(step.time, april(30));
        assert_eq!(step.rain_probability, 0.0);
        assert_eq!(step.rain_mm, 0.0);
        assert_eq!(step.rain_mm_raw, 0.0);
        assert!((0.0..=100.0).contains(&step.cloud));
        assert!((4.0..=8.0).contains(&step.wind));

        assert_eq!(report.classifier.test_rows, 4);
        assert_eq!(report.classifier.accuracy, Some(1.0));
        assert_eq!(report.classifier.roc_auc, None);
        assert!(report.rain_amount.is_none());
        assert_eq!(report.summary.total_rain_mm, 0.0);
        let recent = report.recent.unwrap();
        assert_eq!(recent.height(), 7);
        assert_eq!(recent.last_time(), Some(april(29)));
    }

    #[test]
    fn test_daily_precipitation_wet_month() {
        let report = daily_precipitation(&daily_observations(Some(3)), &small_config()).unwrap();
        let step = report.forecast[0];
        assert!((0.0..=1.0).contains(&step.rain_probability));
        assert!(step.rain_mm_raw > 0.0 && step.rain_mm_raw <= 2.0);
        assert!((step.rain_mm - step.rain_probability * step.rain_mm_raw).abs() < 1e-9);
        // Day 28 of the held-out tail is rainy.
        let amount = report.rain_amount.unwrap();
        assert_eq!(amount.test_rows, 1);
        assert!(amount.mae.is_some());
        assert!(report.classifier.roc_auc.is_some());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in PipelineKind::ALL {
            assert_eq!(kind.name().parse::<PipelineKind>().unwrap(), kind);
        }
        assert!("weekly-temperature".parse::<PipelineKind>().is_err());
    }

    #[test]
    fn test_default_variables_match_frequency() {
        for kind in PipelineKind::ALL {
            assert!(default_variables(kind)
                .iter()
                .all(|v| v.frequency() == kind.frequency()));
        }
    }

    #[test]
    fn test_next_day_hours() {
        assert_eq!(next_day_hours(Some(at(1, 23))), (24, 0));
        assert_eq!(next_day_hours(Some(at(1, 10))), (37, 13));
    }

    #[test]
    fn test_hourly_precipitation_covers_next_day() {
        let report = hourly_precipitation(&hourly_observations(200), &small_config()).unwrap();
        // 200 hours end at day 9, 07:00; the forecast is all of day 10.
        assert_eq!(report.forecast.len(), 24);
        assert_eq!(report.forecast[0].time, at(10, 0));
        assert_eq!(report.forecast[23].time, at(10, 23));
        for step in &report.forecast {
            assert!((0.0..=1.0).contains(&step.rain_probability));
            assert!((0.0..=100.0).contains(&step.cloud));
            assert!((step.rain_mm - step.rain_probability * step.rain_mm_raw).abs() < 1e-9);
        }
        assert!(report.recent.is_none());
        assert!(report.classifier.accuracy.is_some());
    }

    #[test]
    fn test_hourly_temperature_report() {
        let report = hourly_temperature(&hourly_observations(200), &small_config()).unwrap();
        assert_eq!(report.forecast.len(), 24);
        assert_eq!(report.scores.len(), 1);
        assert!(report.scores[0].mae.is_some());
        assert_eq!(report.train_rows + report.test_rows, 200 - 24);
    }

    #[test]
    fn test_too_short_history() {
        let result = hourly_temperature(&hourly_observations(20), &small_config());
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientHistory { required: 25, .. })
        ));
    }
}
