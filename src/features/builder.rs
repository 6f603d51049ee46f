//! Builds feature tables from observation frames with Polars lazy expressions.

use crate::features::calendar::CalendarFeatures;
use crate::features::error::FeatureError;
use crate::features::feature_set::{DerivedColumn, FeatureSet};
use crate::features::table::FeatureTable;
use crate::types::observation_frame::{ObservationFrame, TIME_COLUMN};
use log::debug;
use polars::prelude::*;

/// Derives lag, rolling, derived and calendar columns and drops every row that still
/// holds a missing value.
///
/// The first [`FeatureSet::max_window`] rows never survive: their lags or rolling
/// windows reach before the start of the series.
pub fn build_features(
    observations: &ObservationFrame,
    set: &FeatureSet,
) -> Result<FeatureTable, FeatureError> {
    check_columns(observations, set)?;

    let mut frame = observations.frame().clone();
    let calendar: Vec<CalendarFeatures> = observations
        .times()
        .iter()
        .map(|t| CalendarFeatures::at(*t))
        .collect();
    for field in &set.calendar {
        let values: Vec<f64> = calendar.iter().map(|c| c.get(*field)).collect();
        frame.with_column(Column::new(field.column().into(), values))?;
    }

    let derived: Vec<Expr> = set.derived.iter().map(derived_expr).collect();

    let mut history: Vec<Expr> = Vec::new();
    for lag in &set.lags {
        for k in 1..=lag.max_lag {
            history.push(
                col(lag.column.as_str())
                    .shift(lit(k as i64))
                    .alias(FeatureSet::lag_name(&lag.column, k)),
            );
        }
    }
    for rolling in &set.rolling {
        history.push(
            col(rolling.column.as_str())
                .rolling_mean(RollingOptionsFixedWindow {
                    window_size: rolling.window,
                    min_periods: rolling.window,
                    ..Default::default()
                })
                .alias(FeatureSet::rolling_name(&rolling.column, rolling.window)),
        );
    }

    let feature_names = set.feature_names(observations.columns());
    let mut selection: Vec<Expr> = vec![col(TIME_COLUMN)];
    selection.extend(feature_names.iter().map(|name| col(name.as_str())));
    selection.extend(target_columns(observations, set).into_iter().map(col));

    let mut lazy = frame.lazy();
    if !derived.is_empty() {
        lazy = lazy.with_columns(derived);
    }
    if !history.is_empty() {
        lazy = lazy.with_columns(history);
    }
    let collected = lazy.select(selection).collect()?;
    let complete = collected.drop_nulls::<String>(None)?;
    debug!(
        "Built {} feature rows ({} columns) from {} observations",
        complete.height(),
        feature_names.len(),
        observations.height()
    );

    FeatureTable::new(complete, feature_names)
}

/// Excluded columns present in the table, measurement columns first.
fn target_columns<'a>(observations: &'a ObservationFrame, set: &'a FeatureSet) -> Vec<&'a str> {
    observations
        .columns()
        .iter()
        .map(String::as_str)
        .chain(set.derived.iter().map(DerivedColumn::name))
        .filter(|c| set.is_excluded(c))
        .collect()
}

fn derived_expr(derived: &DerivedColumn) -> Expr {
    match derived {
        DerivedColumn::RainFlag {
            source,
            threshold,
            name,
        } => when(col(source.as_str()).gt(lit(*threshold)))
            .then(lit(1.0))
            .otherwise(lit(0.0))
            .alias(name.as_str()),
        DerivedColumn::Mean { a, b, name } => {
            ((col(a.as_str()) + col(b.as_str())) / lit(2.0)).alias(name.as_str())
        }
    }
}

fn check_columns(observations: &ObservationFrame, set: &FeatureSet) -> Result<(), FeatureError> {
    let mut known: Vec<&str> = observations.columns().iter().map(String::as_str).collect();
    for derived in &set.derived {
        if let Some(missing) = derived.sources().into_iter().find(|s| !known.contains(s)) {
            return Err(FeatureError::UnknownColumn(missing.to_string()));
        }
        known.push(derived.name());
    }
    let referenced = set
        .lags
        .iter()
        .map(|l| l.column.as_str())
        .chain(set.rolling.iter().map(|r| r.column.as_str()));
    for column in referenced {
        if !known.contains(&column) {
            return Err(FeatureError::UnknownColumn(column.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::calendar::CalendarField;
    use crate::features::feature_set::{LagSpec, RollingSpec};
    use crate::types::frequency::Frequency;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hourly(temps: Vec<Option<f64>>, precip: Vec<Option<f64>>) -> ObservationFrame {
        let times = (0..temps.len())
            .map(|i| start() + Duration::hours(i as i64))
            .collect();
        ObservationFrame::from_columns(
            Frequency::Hourly,
            times,
            vec![("temp".to_string(), temps), ("precip".to_string(), precip)],
        )
        .unwrap()
    }

    fn simple_set() -> FeatureSet {
        FeatureSet {
            derived: vec![DerivedColumn::RainFlag {
                source: "precip".to_string(),
                threshold: 0.05,
                name: "rain_flag".to_string(),
            }],
            lags: vec![LagSpec {
                column: "temp".to_string(),
                max_lag: 2,
            }],
            rolling: vec![RollingSpec {
                column: "temp".to_string(),
                window: 3,
            }],
            calendar: vec![CalendarField::HourSin, CalendarField::HourCos],
            excluded: vec!["temp".to_string(), "rain_flag".to_string()],
        }
    }

    #[test]
    fn test_incomplete_leading_rows_are_dropped() {
        let temps = (0..6).map(|i| Some(i as f64)).collect();
        let precip = vec![Some(0.0), Some(0.2), Some(0.0), Some(0.1), Some(0.0), Some(0.0)];
        let table = build_features(&hourly(temps, precip), &simple_set()).unwrap();

        assert_eq!(table.height(), 4);
        assert_eq!(table.times()[0], start() + Duration::hours(2));
        assert_eq!(table.column("temp_lag1").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(table.column("temp_lag2").unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.column("temp_roll3").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(table.column("rain_flag").unwrap(), vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(table.column("temp").unwrap(), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            table.frame().column(TIME_COLUMN).unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
    }

    #[test]
    fn test_rows_with_gaps_never_reach_the_table() {
        let temps = vec![Some(0.0), Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0), Some(7.0)];
        let precip = vec![Some(0.0); 8];
        let table = build_features(&hourly(temps, precip), &simple_set()).unwrap();

        // The gap at row 3 poisons row 3 itself and every row whose window covers it.
        let hours: Vec<i64> = table
            .times()
            .iter()
            .map(|t| (*t - start()).num_hours())
            .collect();
        assert_eq!(hours, vec![2, 6, 7]);
        for row in table.matrix().unwrap() {
            assert!(row.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_feature_layout_matches_names() {
        let temps = (0..5).map(|i| Some(i as f64)).collect();
        let table = build_features(&hourly(temps, vec![Some(0.0); 5]), &simple_set()).unwrap();

        assert_eq!(
            table.feature_names(),
            &["precip", "temp_lag1", "temp_lag2", "temp_roll3", "hour_sin", "hour_cos"]
        );
        let last = table.last_row().unwrap();
        assert_eq!(last.len(), 6);
        assert_eq!(last[1], 3.0);
        assert_eq!(last[4], CalendarFeatures::at(start() + Duration::hours(4)).hour_sin);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let mut set = simple_set();
        set.lags.push(LagSpec {
            column: "wind".to_string(),
            max_lag: 1,
        });
        let err = build_features(&hourly(vec![Some(1.0)], vec![Some(0.0)]), &set).unwrap_err();
        assert!(matches!(err, FeatureError::UnknownColumn(c) if c == "wind"));
    }

    #[test]
    fn test_chronological_split_and_filter() {
        let temps = (0..12).map(|i| Some(i as f64)).collect();
        let precip = (0..12).map(|i| Some(if i % 2 == 0 { 1.0 } else { 0.0 })).collect();
        let table = build_features(&hourly(temps, precip), &simple_set()).unwrap();
        assert_eq!(table.height(), 10);

        let (train, test) = table.chronological_split(0.2).unwrap();
        assert_eq!(train.height(), 8);
        assert_eq!(test.height(), 2);
        assert!(train.last_time().unwrap() < test.times()[0]);
        assert!(table.chronological_split(1.0).is_err());

        let rainy = table.filter_greater("precip", 0.05).unwrap();
        assert_eq!(rainy.height(), 5);
        assert!(rainy.column("precip").unwrap().iter().all(|p| *p > 0.05));
        assert_eq!(rainy.times().len(), rainy.frame().height());
    }
}
