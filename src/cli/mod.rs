//! Command line interface.

pub mod command;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use meteocast::config::CONFIG_FILE_NAME;
use meteocast::forecast::pipeline::PipelineKind;
use meteocast::forecast::recursive::LagPolicy;
use meteocast::maps::themes::Theme;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Weather forecasts from archive observations, and thematic environmental maps
pub struct Cli {
    /// Configuration file, read if it exists
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train on archive observations and forecast ahead
    Forecast {
        /// daily-temperature, hourly-temperature, daily-precipitation or hourly-precipitation
        kind: PipelineKind,
        /// First archive day (defaults per forecast kind)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last archive day (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Number of steps to forecast
        #[arg(long)]
        horizon: Option<usize>,
        /// recompute or carry-forward
        #[arg(long, default_value_t = LagPolicy::Recompute)]
        lag_policy: LagPolicy,
        /// Write HTML plots of a temperature forecast into this directory
        /// (needs the `plot` feature)
        #[arg(long)]
        plot: Option<PathBuf>,
    },
    /// Render a thematic map to an HTML file
    Map {
        /// demo, eco-trend, biodiversity-pulse, drought-water, fire-watch or solar-atlas
        theme: Theme,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Cloud project the tiles are rendered under
        #[arg(long)]
        project: Option<String>,
    },
}
