//! Defines the `Variable` enum, mapping archive API variable names to the short
//! column names used throughout the observation and feature frames.

use crate::types::frequency::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A measured quantity that can be requested from the weather archive.
///
/// Hourly and daily variables are distinct: the archive API only accepts hourly
/// variables in the `hourly` parameter and daily aggregates in the `daily` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Air temperature at 2 m (°C).
    Temperature,
    /// Relative humidity at 2 m (%).
    RelativeHumidity,
    /// Total precipitation of the preceding hour (mm).
    Precipitation,
    /// Total cloud cover (%).
    CloudCover,
    /// Wind speed at 10 m.
    WindSpeed,
    /// Daily maximum air temperature at 2 m (°C).
    TemperatureMax,
    /// Daily minimum air temperature at 2 m (°C).
    TemperatureMin,
    /// Daily precipitation sum (mm).
    PrecipitationSum,
    /// Daily rain sum, excluding snow (mm).
    RainSum,
    /// Daily mean cloud cover (%).
    CloudCoverMean,
    /// Daily mean relative humidity (%).
    RelativeHumidityMean,
    /// Daily maximum wind speed at 10 m.
    WindSpeedMax,
}

impl Variable {
    /// Every variable, hourly ones first.
    pub const ALL: [Variable; 12] = [
        Variable::Temperature,
        Variable::RelativeHumidity,
        Variable::Precipitation,
        Variable::CloudCover,
        Variable::WindSpeed,
        Variable::TemperatureMax,
        Variable::TemperatureMin,
        Variable::PrecipitationSum,
        Variable::RainSum,
        Variable::CloudCoverMean,
        Variable::RelativeHumidityMean,
        Variable::WindSpeedMax,
    ];

    /// Name of the variable in the archive API request and response.
    pub fn api_name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature_2m",
            Variable::RelativeHumidity => "relative_humidity_2m",
            Variable::Precipitation => "precipitation",
            Variable::CloudCover => "cloud_cover",
            Variable::WindSpeed => "wind_speed_10m",
            Variable::TemperatureMax => "temperature_2m_max",
            Variable::TemperatureMin => "temperature_2m_min",
            Variable::PrecipitationSum => "precipitation_sum",
            Variable::RainSum => "rain_sum",
            Variable::CloudCoverMean => "cloud_cover_mean",
            Variable::RelativeHumidityMean => "relative_humidity_2m_mean",
            Variable::WindSpeedMax => "wind_speed_10m_max",
        }
    }

    /// Short column name used in observation and feature frames.
    pub fn column(&self) -> &'static str {
        match self {
            Variable::Temperature => "temp",
            Variable::RelativeHumidity => "humidity",
            Variable::Precipitation => "precip",
            Variable::CloudCover => "cloud",
            Variable::WindSpeed => "wind",
            Variable::TemperatureMax => "temp_max",
            Variable::TemperatureMin => "temp_min",
            Variable::PrecipitationSum => "precip_sum",
            Variable::RainSum => "rain_sum",
            Variable::CloudCoverMean => "cloudcover",
            Variable::RelativeHumidityMean => "humidity",
            Variable::WindSpeedMax => "wind_max",
        }
    }

    /// The archive block this variable belongs to.
    pub fn frequency(&self) -> Frequency {
        match self {
            Variable::Temperature
            | Variable::RelativeHumidity
            | Variable::Precipitation
            | Variable::CloudCover
            | Variable::WindSpeed => Frequency::Hourly,
            _ => Frequency::Daily,
        }
    }

    /// Every variable of one archive block, in [`Variable::ALL`] order.
    pub fn for_frequency(frequency: Frequency) -> impl Iterator<Item = Variable> {
        Variable::ALL
            .into_iter()
            .filter(move |v| v.frequency() == frequency)
    }

    /// Looks a variable up by its archive API name.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteocast::Variable;
    ///
    /// assert_eq!(Variable::from_api_name("rain_sum"), Some(Variable::RainSum));
    /// assert_eq!(Variable::from_api_name("snowfall"), None);
    /// ```
    pub fn from_api_name(name: &str) -> Option<Variable> {
        Variable::ALL.into_iter().find(|v| v.api_name() == name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_unique_per_frequency() {
        for frequency in [Frequency::Hourly, Frequency::Daily] {
            let mut columns: Vec<&str> = Variable::ALL
                .iter()
                .filter(|v| v.frequency() == frequency)
                .map(|v| v.column())
                .collect();
            let before = columns.len();
            columns.sort();
            columns.dedup();
            assert_eq!(before, columns.len(), "duplicate column for {}", frequency);
        }
    }

    #[test]
    fn test_api_name_roundtrip() {
        for variable in Variable::ALL {
            assert_eq!(Variable::from_api_name(variable.api_name()), Some(variable));
        }
    }
}
