use chrono::NaiveDate;
use meteocast::forecast::pipeline::PipelineKind;
use meteocast::forecast::recursive::LagPolicy;
use meteocast::{report, LatLon, Meteocast, MeteocastError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), MeteocastError> {
    // Set RUST_LOG=info (or debug) to follow the download and the model fits.
    env_logger::init();
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    let client = Meteocast::new();

    let report = client
        .forecast(PipelineKind::DailyTemperature)
        .location(LatLon(51.92, 4.48))
        .start(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())
        .horizon(3)
        .lag_policy(LagPolicy::Recompute)
        .call()
        .await?;
    println!("{}", report::render(&report)?);

    // Only the history is downloaded here; the model runs on the next hours.
    let rain = client
        .forecast(PipelineKind::HourlyPrecipitation)
        .location(LatLon(51.92, 4.48))
        .call()
        .await?;
    println!("{}", report::render(&rain)?);

    Ok(())
}
