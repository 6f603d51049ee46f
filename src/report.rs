//! Console rendering of pipeline reports. Tables are Polars frames printed through
//! their `Display` implementation.

use crate::forecast::pipeline::{
    ClassifierScore, ForecastReport, PrecipitationForecast, PrecipitationReport, RegressionScore,
    TemperatureReport,
};
use crate::types::frequency::Frequency;
use crate::types::observation_frame::{ObservationFrame, TIME_COLUMN};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to build report table: {0}")]
    Frame(#[from] PolarsError),
    #[error("Failed to write report: {0}")]
    Format(#[from] fmt::Error),
}

pub fn render(report: &ForecastReport) -> Result<String, ReportError> {
    match report {
        ForecastReport::Temperature(report) => render_temperature(report),
        ForecastReport::Precipitation(report) => render_precipitation(report),
    }
}

pub fn render_temperature(report: &TemperatureReport) -> Result<String, ReportError> {
    let mut out = String::new();
    writeln!(
        out,
        "{}: {} training rows, {} test rows",
        report.kind, report.train_rows, report.test_rows
    )?;
    for score in &report.scores {
        writeln!(out, "{}", score_line(score, "°C"))?;
    }
    writeln!(out, "\nForecast:\n{}", forecast_frame(report)?)?;
    Ok(out)
}

pub fn render_precipitation(report: &PrecipitationReport) -> Result<String, ReportError> {
    let mut out = String::new();
    writeln!(
        out,
        "{}: {} training rows, {} test rows",
        report.kind, report.train_rows, report.test_rows
    )?;
    writeln!(out, "{}", classifier_line(&report.classifier))?;
    match &report.rain_amount {
        Some(score) => writeln!(out, "{}", score_line(score, "mm"))?,
        None => writeln!(out, "Rain amount: no rainy test rows to score")?,
    }
    writeln!(out, "\nForecast:\n{}", precipitation_frame(report)?)?;

    let summary = &report.summary;
    writeln!(out, "\nSummary:")?;
    writeln!(
        out,
        "Average rain probability: {:.1}%",
        summary.mean_rain_probability * 100.0
    )?;
    writeln!(out, "Expected total rainfall: {:.2} mm", summary.total_rain_mm)?;
    writeln!(out, "Average wind speed: {:.1}", summary.mean_wind)?;
    writeln!(out, "Average cloud cover: {:.1}%", summary.mean_cloud)?;

    if let Some(recent) = &report.recent {
        writeln!(out, "\nRecent observations:\n{}", observations_frame(recent)?)?;
    }
    Ok(out)
}

/// One row per forecast step: the formatted time and a `pred_<target>` column per
/// target, rounded to two decimals.
pub fn forecast_frame(report: &TemperatureReport) -> PolarsResult<DataFrame> {
    let frequency = report.kind.frequency();
    let names: Vec<&str> = report
        .forecast
        .first()
        .map(|step| step.values.iter().map(|(name, _)| name.as_str()).collect())
        .unwrap_or_default();

    let mut columns = vec![time_column(
        report.forecast.iter().map(|step| step.time),
        frequency,
    )];
    for name in names {
        let values: Vec<Option<f64>> = report
            .forecast
            .iter()
            .map(|step| step.get(name).map(|v| round(v, 2)))
            .collect();
        columns.push(Column::new(format!("pred_{name}").into(), values));
    }
    DataFrame::new(columns)
}

/// The last `last` test rows with `<target>_actual` and `<target>_predicted` columns.
pub fn holdout_frame(report: &TemperatureReport, last: usize) -> PolarsResult<DataFrame> {
    let start = report.test_times.len().saturating_sub(last);
    let mut columns = vec![time_column(
        report.test_times[start..].iter().copied(),
        report.kind.frequency(),
    )];
    for series in &report.holdout {
        let tail = |values: &[f64]| -> Vec<f64> {
            values[start.min(values.len())..]
                .iter()
                .map(|v| round(*v, 2))
                .collect()
        };
        columns.push(Column::new(
            format!("{}_actual", series.target).into(),
            tail(&series.actual),
        ));
        columns.push(Column::new(
            format!("{}_predicted", series.target).into(),
            tail(&series.predicted),
        ));
    }
    DataFrame::new(columns)
}

pub fn precipitation_frame(report: &PrecipitationReport) -> PolarsResult<DataFrame> {
    let forecast = &report.forecast;
    let column = |name: &str, f: fn(&PrecipitationForecast) -> f64| {
        let values: Vec<f64> = forecast.iter().map(f).collect();
        Column::new(name.into(), values)
    };
    DataFrame::new(vec![
        time_column(forecast.iter().map(|step| step.time), report.kind.frequency()),
        column("rain_prob_%", |step| round(step.rain_probability * 100.0, 1)),
        column("rain_mm", |step| round(step.rain_mm, 2)),
        column("rain_mm_raw", |step| round(step.rain_mm_raw, 2)),
        column("wind_speed", |step| round(step.wind, 2)),
        column("cloud_cover_%", |step| round(step.cloud, 2)),
    ])
}

/// Every row of an observation frame, missing values left as nulls.
pub fn observations_frame(frame: &ObservationFrame) -> PolarsResult<DataFrame> {
    let mut columns = vec![time_column(frame.times().iter().copied(), frame.frequency())];
    for name in frame.columns() {
        let values: Vec<Option<f64>> = frame
            .values(name)?
            .into_iter()
            .map(|v| v.map(|v| round(v, 2)))
            .collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    DataFrame::new(columns)
}

fn time_column(times: impl Iterator<Item = NaiveDateTime>, frequency: Frequency) -> Column {
    let format = frequency.time_format();
    let values: Vec<String> = times.map(|t| t.format(format).to_string()).collect();
    Column::new(TIME_COLUMN.into(), values)
}

fn round(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn score_line(score: &RegressionScore, unit: &str) -> String {
    match (score.mae, score.rmse) {
        (Some(mae), Some(rmse)) => format!(
            "{}: MAE {:.2} {unit} | RMSE {:.2} {unit} ({} test rows)",
            score.target, mae, rmse, score.test_rows
        ),
        _ => format!("{}: no test rows to score", score.target),
    }
}

fn classifier_line(score: &ClassifierScore) -> String {
    let metric = |value: Option<f64>| match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    };
    format!(
        "Rain classifier: accuracy {}, AUC {} ({} test rows)",
        metric(score.accuracy),
        metric(score.roc_auc),
        score.test_rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::pipeline::{HoldoutSeries, PipelineKind, PrecipitationSummary};
    use crate::forecast::recursive::ForecastStep;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn temperature_report() -> TemperatureReport {
        TemperatureReport {
            kind: PipelineKind::DailyTemperature,
            train_rows: 80,
            test_rows: 3,
            scores: vec![RegressionScore {
                target: "temp_max".to_string(),
                test_rows: 3,
                mae: Some(1.234),
                rmse: Some(1.5),
            }],
            test_times: vec![day(1), day(2), day(3)],
            holdout: vec![HoldoutSeries {
                target: "temp_max".to_string(),
                actual: vec![20.0, 21.0, 22.0],
                predicted: vec![19.5, 21.25, 23.123],
            }],
            forecast: vec![ForecastStep {
                time: day(4),
                values: vec![("temp_max".to_string(), 21.456), ("temp_min".to_string(), 12.0)],
            }],
        }
    }

    #[test]
    fn test_temperature_table() {
        let report = temperature_report();
        let frame = forecast_frame(&report).unwrap();
        assert_eq!(
            frame.get_column_names_str(),
            vec!["time", "pred_temp_max", "pred_temp_min"]
        );
        assert_eq!(
            frame.column("pred_temp_max").unwrap().f64().unwrap().get(0),
            Some(21.46)
        );

        let text = render_temperature(&report).unwrap();
        assert!(text.contains("temp_max: MAE 1.23 °C | RMSE 1.50 °C"));
        assert!(text.contains("pred_temp_max"));
        assert!(text.contains("2025-06-04"));
        assert!(text.contains("21.46"));
        assert!(text.contains("12.0"));
    }

    #[test]
    fn test_holdout_keeps_the_latest_rows() {
        let frame = holdout_frame(&temperature_report(), 2).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(
            frame.get_column_names_str(),
            vec!["time", "temp_max_actual", "temp_max_predicted"]
        );
        let time = frame.column("time").unwrap().str().unwrap().get(0);
        assert_eq!(time, Some("2025-06-02"));
        let predicted: Vec<Option<f64>> = frame
            .column("temp_max_predicted")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(predicted, vec![Some(21.25), Some(23.12)]);

        assert_eq!(holdout_frame(&temperature_report(), 100).unwrap().height(), 3);
    }

    #[test]
    fn test_precipitation_percentages() {
        let step = PrecipitationForecast {
            time: day(3),
            rain_probability: 0.4,
            rain_mm: 1.2,
            rain_mm_raw: 3.0,
            wind: 5.0,
            cloud: 80.0,
        };
        let report = PrecipitationReport {
            kind: PipelineKind::DailyPrecipitation,
            train_rows: 10,
            test_rows: 2,
            classifier: ClassifierScore {
                test_rows: 2,
                accuracy: Some(0.5),
                roc_auc: None,
            },
            rain_amount: None,
            summary: PrecipitationSummary::of(&[step]),
            forecast: vec![step],
            recent: None,
        };
        let frame = precipitation_frame(&report).unwrap();
        assert_eq!(frame.shape(), (1, 6));
        assert_eq!(
            frame.column("rain_prob_%").unwrap().f64().unwrap().get(0),
            Some(40.0)
        );

        let text = render_precipitation(&report).unwrap();
        assert!(text.contains("rain_prob_%"));
        assert!(text.contains("40.0"));
        assert!(text.contains("AUC n/a"));
        assert!(text.contains("Expected total rainfall: 1.20 mm"));
        assert!(text.contains("no rainy test rows"));
        assert!(!text.contains("Recent observations"));
    }

    #[test]
    fn test_observations_show_missing_values() {
        let frame = ObservationFrame::from_columns(
            Frequency::Daily,
            vec![day(1), day(2)],
            vec![("precip_sum".to_string(), vec![Some(0.504), None])],
        )
        .unwrap();
        let table = observations_frame(&frame).unwrap();
        let precip = table.column("precip_sum").unwrap();
        assert_eq!(precip.null_count(), 1);
        assert_eq!(precip.f64().unwrap().get(0), Some(0.5));

        let text = table.to_string();
        assert!(text.contains("2025-06-01"));
        assert!(text.contains("null"));
    }
}
