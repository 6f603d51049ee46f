//! Describes one request to the historical weather archive and renders it as a URL.

use crate::meteocast::LatLon;
use crate::types::frequency::Frequency;
use crate::types::variable::Variable;
use crate::weather_data::error::WeatherDataError;
use bon::Builder;
use chrono::NaiveDate;
use reqwest::Url;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEZONE: &str = "Europe/Amsterdam";

/// A single archive query: one location, one inclusive date range, one block of
/// variables (all hourly or all daily).
///
/// # Examples
///
/// ```
/// use meteocast::{ArchiveRequest, Frequency, LatLon, Variable};
/// use chrono::NaiveDate;
///
/// let request = ArchiveRequest::builder()
///     .location(LatLon(52.37, 4.89))
///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
///     .frequency(Frequency::Daily)
///     .variables(vec![Variable::TemperatureMax, Variable::TemperatureMin])
///     .build();
///
/// let url = request.url().unwrap();
/// assert!(url.as_str().contains("daily=temperature_2m_max%2Ctemperature_2m_min"));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ArchiveRequest {
    location: LatLon,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
    variables: Vec<Variable>,
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    timezone: String,
    #[builder(into, default = ARCHIVE_URL.to_string())]
    base_url: String,
}

impl ArchiveRequest {
    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Checks the request before any network traffic happens.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::InvalidRequest`] if no variables are requested, if a
    /// variable belongs to the other frequency block, or if `start` is after `end`.
    pub fn validate(&self) -> Result<(), WeatherDataError> {
        if self.variables.is_empty() {
            return Err(WeatherDataError::InvalidRequest(
                "at least one variable is required".to_string(),
            ));
        }
        if let Some(wrong) = self
            .variables
            .iter()
            .find(|v| v.frequency() != self.frequency)
        {
            return Err(WeatherDataError::InvalidRequest(format!(
                "variable '{}' is {} but the request is {}",
                wrong,
                wrong.frequency(),
                self.frequency
            )));
        }
        if self.start > self.end {
            return Err(WeatherDataError::InvalidRequest(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Renders the GET URL, validating the request first.
    pub fn url(&self) -> Result<Url, WeatherDataError> {
        self.validate()?;
        let names = self
            .variables
            .iter()
            .map(|v| v.api_name())
            .collect::<Vec<_>>()
            .join(",");
        let params = [
            ("latitude", self.location.0.to_string()),
            ("longitude", self.location.1.to_string()),
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
            (self.frequency.path_segment(), names),
            ("timezone", self.timezone.clone()),
        ];
        Url::parse_with_params(&self.base_url, &params).map_err(|e| {
            WeatherDataError::InvalidUrl {
                url: self.base_url.clone(),
                message: e.to_string(),
            }
        })
    }
}
