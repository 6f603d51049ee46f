use crate::types::observation_frame::ObservationFrame;
use crate::weather_data::archive_request::ArchiveRequest;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::response::parse_archive_response;
use log::{info, warn};
use reqwest::Client;

/// Performs archive requests. One GET per request, no retries and no caching:
/// a failed request aborts the run.
#[derive(Debug, Clone, Default)]
pub struct ArchiveClient {
    http: Client,
}

impl ArchiveClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Downloads and parses the observations described by `request`.
    pub async fn fetch(&self, request: &ArchiveRequest) -> Result<ObservationFrame, WeatherDataError> {
        let url = request.url()?;
        info!(
            "Fetching {} data from {} to {} via {}",
            request.frequency(),
            request.start(),
            request.end(),
            url
        );

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.to_string(), e))?;
        let frame = parse_archive_response(&body, request)?;
        info!(
            "Data downloaded: {} {} observations",
            frame.height(),
            request.frequency()
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meteocast::LatLon;
    use crate::types::frequency::Frequency;
    use crate::types::variable::Variable;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_for(server: &MockServer) -> ArchiveRequest {
        ArchiveRequest::builder()
            .location(LatLon(52.37, 4.89))
            .start(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
            .frequency(Frequency::Daily)
            .variables(vec![Variable::TemperatureMax])
            .base_url(format!("{}/v1/archive", server.uri()))
            .build()
    }

    #[tokio::test]
    async fn test_fetch_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("daily", "temperature_2m_max"))
            .and(query_param("timezone", "Europe/Amsterdam"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2025-01-01", "2025-01-02"],
                    "temperature_2m_max": [4.0, 5.5]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let frame = ArchiveClient::new()
            .fetch(&request_for(&server))
            .await
            .unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.values("temp_max").unwrap(), vec![Some(4.0), Some(5.5)]);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = ArchiveClient::new()
            .fetch(&request_for(&server))
            .await
            .unwrap_err();
        match err {
            WeatherDataError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 429),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = ArchiveClient::new()
            .fetch(&request_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherDataError::JsonParse(_)));
    }
}
