mod clients;
pub mod config;
pub mod credentials;
mod error;
pub mod features;
pub mod forecast;
pub mod maps;
mod meteocast;
pub mod model;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
mod types;
mod utils;
mod weather_data;

pub use error::MeteocastError;
pub use meteocast::*;

pub use clients::daily_client::*;
pub use clients::hourly_client::*;

pub use features::calendar::{CalendarFeatures, CalendarField};
pub use types::frequency::*;
pub use types::observation_frame::{ObservationFrame, TIME_COLUMN};
pub use types::variable::Variable;

pub use weather_data::archive_client::ArchiveClient;
pub use weather_data::archive_request::{ArchiveRequest, ARCHIVE_URL, DEFAULT_TIMEZONE};
pub use weather_data::error::WeatherDataError;
pub use weather_data::response::parse_archive_response;
