//! HTML plots of temperature reports, drawn with plotlars. Enabled by the `plot`
//! feature.

use crate::forecast::pipeline::TemperatureReport;
use crate::report::{forecast_frame, holdout_frame};
use crate::types::observation_frame::TIME_COLUMN;
use crate::utils::ensure_dir_exists;
use log::info;
use plotlars::{Line, Plot, Rgb, Shape, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Test rows shown by [`holdout_plot`].
pub const HOLDOUT_ROWS: usize = 100;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to build plot data: {0}")]
    Frame(#[from] PolarsError),
    #[error("Failed to create plot directory {0}: {1}")]
    Write(PathBuf, #[source] io::Error),
    #[error("Report has no {0} to plot")]
    Empty(&'static str),
}

/// Actual against predicted values of every target over the last [`HOLDOUT_ROWS`]
/// test rows. Predictions are dashed.
pub fn holdout_plot(report: &TemperatureReport) -> Result<TimeSeriesPlot, PlotError> {
    let frame = holdout_frame(report, HOLDOUT_ROWS)?;
    let names = value_columns(&frame);
    let Some((first, rest)) = names.split_first() else {
        return Err(PlotError::Empty("test predictions"));
    };

    let mut colors = Vec::with_capacity(names.len());
    let mut lines = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        // Warm colors for the first target, cool for the second.
        let warm = (i / 2) % 2 == 0;
        if name.ends_with("_predicted") {
            colors.push(if warm { Rgb(255, 165, 0) } else { Rgb(0, 200, 220) });
            lines.push(Line::Dash);
        } else {
            colors.push(if warm { Rgb(220, 50, 30) } else { Rgb(30, 90, 220) });
            lines.push(Line::Solid);
        }
    }

    let title = format!("{} predictions on the test split", report.kind);
    Ok(TimeSeriesPlot::builder()
        .data(&frame)
        .x(TIME_COLUMN)
        .y(first)
        .additional_series(rest.to_vec())
        .colors(colors)
        .lines(lines)
        .plot_title(Text::from(title.as_str()).size(18))
        .x_title("time")
        .y_title("temperature (°C)")
        .build())
}

/// The forecast steps of every target, one marker per step.
pub fn forecast_plot(report: &TemperatureReport) -> Result<TimeSeriesPlot, PlotError> {
    let frame = forecast_frame(report)?;
    let names = value_columns(&frame);
    let Some((first, rest)) = names.split_first() else {
        return Err(PlotError::Empty("forecast"));
    };

    let title = format!("{} forecast", report.kind);
    Ok(TimeSeriesPlot::builder()
        .data(&frame)
        .x(TIME_COLUMN)
        .y(first)
        .additional_series(rest.to_vec())
        .with_shape(true)
        .shapes(names.iter().map(|_| Shape::Circle).collect())
        .plot_title(Text::from(title.as_str()).size(18))
        .x_title("time")
        .y_title("temperature (°C)")
        .build())
}

/// Writes `<kind>-holdout.html` and `<kind>-forecast.html` into `dir` and returns
/// their paths.
pub fn write_plots(report: &TemperatureReport, dir: &Path) -> Result<Vec<PathBuf>, PlotError> {
    ensure_dir_exists(dir).map_err(|e| PlotError::Write(dir.to_path_buf(), e))?;

    let holdout = dir.join(format!("{}-holdout.html", report.kind));
    holdout_plot(report)?.write_html(holdout.to_string_lossy().into_owned());
    let forecast = dir.join(format!("{}-forecast.html", report.kind));
    forecast_plot(report)?.write_html(forecast.to_string_lossy().into_owned());

    info!("Plots written to {}", dir.display());
    Ok(vec![holdout, forecast])
}

fn value_columns(frame: &DataFrame) -> Vec<&str> {
    frame
        .get_column_names_str()
        .into_iter()
        .filter(|name| *name != TIME_COLUMN)
        .collect()
}
