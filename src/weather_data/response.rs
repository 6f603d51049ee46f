//! Turns the JSON body of an archive response into an [`ObservationFrame`].

use crate::types::frequency::Frequency;
use crate::types::observation_frame::ObservationFrame;
use crate::weather_data::archive_request::ArchiveRequest;
use crate::weather_data::error::WeatherDataError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    hourly: Option<ArchiveBlock>,
    #[serde(default)]
    daily: Option<ArchiveBlock>,
}

/// One `"hourly"` or `"daily"` object: a `time` array and one parallel array per variable.
#[derive(Debug, Deserialize)]
struct ArchiveBlock {
    time: Vec<String>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Option<f64>>>,
}

/// Parses the archive JSON for `request` into an observation frame whose columns are
/// the short column names of the requested variables, in request order.
pub fn parse_archive_response(
    body: &str,
    request: &ArchiveRequest,
) -> Result<ObservationFrame, WeatherDataError> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let frequency = request.frequency();
    let block = match frequency {
        Frequency::Hourly => response.hourly,
        Frequency::Daily => response.daily,
    }
    .ok_or(WeatherDataError::MissingBlock(frequency))?;

    let ArchiveBlock { time, mut series } = block;
    let times = time
        .iter()
        .map(|value| parse_time(value, frequency))
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(request.variables().len());
    for variable in request.variables() {
        let values = series
            .remove(variable.api_name())
            .ok_or(WeatherDataError::MissingVariable(*variable))?;
        if values.len() != times.len() {
            return Err(WeatherDataError::LengthMismatch {
                name: variable.api_name().to_string(),
                expected: times.len(),
                found: values.len(),
            });
        }
        columns.push((variable.column().to_string(), values));
    }

    Ok(ObservationFrame::from_columns(frequency, times, columns)?)
}

fn parse_time(value: &str, frequency: Frequency) -> Result<NaiveDateTime, WeatherDataError> {
    let parsed = match frequency {
        Frequency::Hourly => NaiveDateTime::parse_from_str(value, frequency.time_format()),
        Frequency::Daily => NaiveDate::parse_from_str(value, frequency.time_format())
            .map(|date| date.and_time(NaiveTime::MIN)),
    };
    parsed.map_err(|source| WeatherDataError::TimestampParse {
        value: value.to_string(),
        frequency,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meteocast::LatLon;
    use crate::types::variable::Variable;
    use chrono::NaiveDate;

    fn daily_request() -> ArchiveRequest {
        ArchiveRequest::builder()
            .location(LatLon(52.37, 4.89))
            .start(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap())
            .frequency(Frequency::Daily)
            .variables(vec![Variable::TemperatureMax, Variable::PrecipitationSum])
            .build()
    }

    #[test]
    fn test_parse_daily_block() {
        let body = r#"{
            "latitude": 52.37,
            "longitude": 4.89,
            "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
            "daily": {
                "time": ["2025-01-02", "2025-01-01", "2025-01-03"],
                "temperature_2m_max": [6.5, 5.0, null],
                "precipitation_sum": [0.0, 1.2, 3.4]
            }
        }"#;
        let frame = parse_archive_response(body, &daily_request()).unwrap();

        assert_eq!(frame.height(), 3);
        assert_eq!(frame.columns(), &["temp_max", "precip_sum"]);
        assert_eq!(
            frame.values("temp_max").unwrap(),
            vec![Some(5.0), Some(6.5), None]
        );
        assert_eq!(
            frame.times()[0],
            NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_hourly_timestamps() {
        let request = ArchiveRequest::builder()
            .location(LatLon(52.37, 4.89))
            .start(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .frequency(Frequency::Hourly)
            .variables(vec![Variable::Temperature])
            .build();
        let body = r#"{"hourly": {"time": ["2025-01-01T00:00", "2025-01-01T01:00"], "temperature_2m": [1.0, 2.0]}}"#;
        let frame = parse_archive_response(body, &request).unwrap();
        assert_eq!(frame.times()[1].format("%H:%M").to_string(), "01:00");
    }

    #[test]
    fn test_missing_block_and_variable() {
        let err = parse_archive_response(r#"{"hourly": {"time": []}}"#, &daily_request())
            .unwrap_err();
        assert!(matches!(err, WeatherDataError::MissingBlock(Frequency::Daily)));

        let body = r#"{"daily": {"time": ["2025-01-01"], "temperature_2m_max": [1.0]}}"#;
        let err = parse_archive_response(body, &daily_request()).unwrap_err();
        assert!(matches!(
            err,
            WeatherDataError::MissingVariable(Variable::PrecipitationSum)
        ));
    }

    #[test]
    fn test_length_mismatch_and_bad_time() {
        let body = r#"{"daily": {"time": ["2025-01-01", "2025-01-02"], "temperature_2m_max": [1.0], "precipitation_sum": [0.0, 0.0]}}"#;
        assert!(matches!(
            parse_archive_response(body, &daily_request()),
            Err(WeatherDataError::LengthMismatch { expected: 2, found: 1, .. })
        ));

        let body = r#"{"daily": {"time": ["01/02/2025"], "temperature_2m_max": [1.0], "precipitation_sum": [0.0]}}"#;
        assert!(matches!(
            parse_archive_response(body, &daily_request()),
            Err(WeatherDataError::TimestampParse { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_archive_response("not json", &daily_request()),
            Err(WeatherDataError::JsonParse(_))
        ));
    }
}
