//! Provides the `HourlyClient`, obtained via [`Meteocast::hourly()`], for requesting
//! hourly observations at a location.

use crate::error::MeteocastError;
use crate::meteocast::{LatLon, Meteocast};
use crate::types::frequency::Frequency;
use crate::types::observation_frame::ObservationFrame;
use crate::types::variable::Variable;
use bon::bon;
use chrono::NaiveDate;

pub struct HourlyClient<'a> {
    client: &'a Meteocast,
}

#[bon]
impl<'a> HourlyClient<'a> {
    pub(crate) fn new(client: &'a Meteocast) -> Self {
        Self { client }
    }

    #[builder(start_fn = location)]
    #[doc(hidden)]
    pub async fn build_location(
        &self,
        #[builder(start_fn)] coordinate: LatLon,
        start: NaiveDate,
        end: Option<NaiveDate>,
        variables: Option<Vec<Variable>>,
    ) -> Result<ObservationFrame, MeteocastError> {
        let variables =
            variables.unwrap_or_else(|| Variable::for_frequency(Frequency::Hourly).collect());
        self.client
            .observations()
            .location(coordinate)
            .frequency(Frequency::Hourly)
            .variables(variables)
            .start(start)
            .maybe_end(end)
            .call()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeteocastConfig;
    use crate::weather_data::error::WeatherDataError;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_hourly_location_rejects_daily_variables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = Meteocast::with_config(MeteocastConfig {
            archive_url: format!("{}/v1/archive", server.uri()),
            ..Default::default()
        });
        let result = client
            .hourly()
            .location(LatLon(52.37, 4.89))
            .start(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
            .variables(vec![Variable::PrecipitationSum])
            .call()
            .await;
        assert!(matches!(
            result,
            Err(MeteocastError::WeatherData(WeatherDataError::InvalidRequest(_)))
        ));
    }
}
