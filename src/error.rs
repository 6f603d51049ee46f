use crate::credentials::error::CredentialError;
use crate::features::error::FeatureError;
use crate::forecast::error::ForecastError;
use crate::maps::error::MapError;
use crate::model::error::ModelError;
use crate::report::ReportError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteocastError {
    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to load configuration")]
    Config(#[from] config::ConfigError),
}
