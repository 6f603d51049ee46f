//! Provides the `DailyClient`, obtained via [`Meteocast::daily()`], for requesting
//! daily aggregated observations at a location.

use crate::error::MeteocastError;
use crate::meteocast::{LatLon, Meteocast};
use crate::types::frequency::Frequency;
use crate::types::observation_frame::ObservationFrame;
use crate::types::variable::Variable;
use bon::bon;
use chrono::NaiveDate;

pub struct DailyClient<'a> {
    client: &'a Meteocast,
}

#[bon]
impl<'a> DailyClient<'a> {
    pub(crate) fn new(client: &'a Meteocast) -> Self {
        Self { client }
    }

    /// Daily observations at `coordinate`. Requests every daily variable unless
    /// `variables` narrows it down.
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
            variables.unwrap_or_else(|| Variable::for_frequency(Frequency::Daily).collect());
        self.client
            .observations()
            .location(coordinate)
            .frequency(Frequency::Daily)
            .variables(variables)
            .start(start)
            .maybe_end(end)
            .call()
            .await
    }
}
