//! The main entry point: fetch archive observations for a location and run the
//! forecasting pipelines on them.

use crate::clients::daily_client::DailyClient;
use crate::clients::hourly_client::HourlyClient;
use crate::config::MeteocastConfig;
use crate::error::MeteocastError;
use crate::forecast::pipeline::{self, default_variables, ForecastReport, PipelineConfig, PipelineKind};
use crate::forecast::recursive::LagPolicy;
use crate::types::frequency::Frequency;
use crate::types::observation_frame::ObservationFrame;
use crate::types::variable::Variable;
use crate::weather_data::archive_client::ArchiveClient;
use crate::weather_data::archive_request::ArchiveRequest;
use bon::bon;
use chrono::{Local, NaiveDate};
use log::info;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use meteocast::LatLon;
///
/// let amsterdam = LatLon(52.37, 4.89);
/// assert_eq!(amsterdam.0, 52.37); // Latitude
/// assert_eq!(amsterdam.1, 4.89); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Fetches observations and produces forecasts.
///
/// Location, timezone, start dates and model parameters default to the values in
/// [`MeteocastConfig`]; each call may override them.
pub struct Meteocast {
    archive: ArchiveClient,
    config: MeteocastConfig,
}

impl Default for Meteocast {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl Meteocast {
    /// A client with the built-in default configuration.
    pub fn new() -> Self {
        Self::with_config(MeteocastConfig::default())
    }

    pub fn with_config(config: MeteocastConfig) -> Self {
        Self::with_archive_client(config, ArchiveClient::new())
    }

    pub fn with_archive_client(config: MeteocastConfig, archive: ArchiveClient) -> Self {
        Self { archive, config }
    }

    pub fn config(&self) -> &MeteocastConfig {
        &self.config
    }

    /// Starts a daily observations request.
    pub fn daily(&self) -> DailyClient<'_> {
        DailyClient::new(self)
    }

    /// Starts an hourly observations request.
    pub fn hourly(&self) -> HourlyClient<'_> {
        HourlyClient::new(self)
    }

    /// Downloads archive observations. `end` defaults to today, `location` to the
    /// configured one.
    #[builder]
    pub async fn observations(
        &self,
        frequency: Frequency,
        variables: Vec<Variable>,
        start: NaiveDate,
        end: Option<NaiveDate>,
        location: Option<LatLon>,
    ) -> Result<ObservationFrame, MeteocastError> {
        let request = ArchiveRequest::builder()
            .location(location.unwrap_or(self.config.location()))
            .start(start)
            .end(end.unwrap_or_else(|| Local::now().date_naive()))
            .frequency(frequency)
            .variables(variables)
            .timezone(self.config.timezone.clone())
            .base_url(self.config.archive_url.clone())
            .build();
        Ok(self.archive.fetch(&request).await?)
    }

    /// Fetches what the pipeline of `kind` needs and runs it.
    #[builder]
    pub async fn forecast(
        &self,
        #[builder(start_fn)] kind: PipelineKind,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        location: Option<LatLon>,
        horizon: Option<usize>,
        lag_policy: Option<LagPolicy>,
    ) -> Result<ForecastReport, MeteocastError> {
        let observations = self
            .observations()
            .frequency(kind.frequency())
            .variables(default_variables(kind))
            .start(start.unwrap_or(self.config.start_date(kind)))
            .maybe_end(end)
            .maybe_location(location)
            .call()
            .await?;

        let config = PipelineConfig::builder()
            .test_fraction(self.config.test_fraction)
            .refit(self.config.refit)
            .forest(self.config.forest.clone())
            .maybe_horizon(horizon)
            .lag_policy(lag_policy.unwrap_or_default())
            .build();
        info!("Running {} on {} observations", kind, observations.height());
        Ok(pipeline::run(kind, &observations, &config)?)
    }
}
