//! Run configuration: built-in defaults, then an optional `meteocast.toml`, then
//! `METEOCAST__*` environment variables (`__` separates nested keys, e.g.
//! `METEOCAST__FOREST__N_TREES=50`).

use crate::forecast::pipeline::PipelineKind;
use crate::meteocast::LatLon;
use crate::model::params::ForestParams;
use crate::weather_data::archive_request::{ARCHIVE_URL, DEFAULT_TIMEZONE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "meteocast.toml";
pub const ENV_PREFIX: &str = "METEOCAST";

/// First archive day requested by each pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartDates {
    pub daily_temperature: NaiveDate,
    pub hourly_temperature: NaiveDate,
    pub daily_precipitation: NaiveDate,
    pub hourly_precipitation: NaiveDate,
}

impl Default for StartDates {
    fn default() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            daily_temperature: date(2015, 1, 1),
            hourly_temperature: date(2025, 1, 1),
            daily_precipitation: date(2020, 1, 1),
            hourly_precipitation: date(2024, 1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Endpoint of the tile rendering service.
    pub endpoint: String,
    pub project: String,
    pub out_dir: PathBuf,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/tiles".to_string(),
            project: "meteocast-maps".to_string(),
            out_dir: PathBuf::from("maps"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteocastConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub archive_url: String,
    pub test_fraction: f64,
    /// Retrain on every complete row before forecasting.
    pub refit: bool,
    pub forest: ForestParams,
    pub start_dates: StartDates,
    pub maps: MapsConfig,
}

impl Default for MeteocastConfig {
    fn default() -> Self {
        Self {
            latitude: 52.37,
            longitude: 4.89,
            timezone: DEFAULT_TIMEZONE.to_string(),
            archive_url: ARCHIVE_URL.to_string(),
            test_fraction: 0.2,
            refit: true,
            forest: ForestParams::default(),
            start_dates: StartDates::default(),
            maps: MapsConfig::default(),
        }
    }
}

impl MeteocastConfig {
    /// Loads `meteocast.toml` from the working directory if present.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Loads an optional file at `path`, with environment overrides on top.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&MeteocastConfig::default())?;
        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        builder.build()?.try_deserialize()
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    pub fn start_date(&self, kind: PipelineKind) -> NaiveDate {
        match kind {
            PipelineKind::DailyTemperature => self.start_dates.daily_temperature,
            PipelineKind::HourlyTemperature => self.start_dates.hourly_temperature,
            PipelineKind::DailyPrecipitation => self.start_dates.daily_precipitation,
            PipelineKind::HourlyPrecipitation => self.start_dates.hourly_precipitation,
        }
    }
}
