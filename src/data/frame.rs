use itertools::izip;
use polars::prelude::{Column, DataFrame, DataType, PlSmallStr};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    data::domain::{Classification, DailyBar},
    error::{DataError, LabelTraderResult},
};

/// Columns of a labeled daily-bar table, named as in the source CSV export.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum DailyBarCol {
    #[strum(serialize = "Year")]
    Year,
    #[strum(serialize = "Week_Number")]
    WeekNumber,
    #[strum(serialize = "Open")]
    Open,
    #[strum(serialize = "Close")]
    Close,
    #[strum(serialize = "Classification")]
    Classification,
}

impl From<DailyBarCol> for PlSmallStr {
    fn from(value: DailyBarCol) -> Self {
        value.as_str().into()
    }
}

impl DailyBarCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Converts a labeled daily-bar table into validated [`DailyBar`]s, preserving row order.
///
/// Numeric columns are cast to their target type; values that are missing or fail the cast
/// are reported as invalid input together with their row index.
///
/// # Errors
/// - `DataError::ColumnNotFound` if a required column is absent.
/// - `DataError::InvalidInput` for null, non-numeric or negative values and unknown labels.
pub fn daily_bars_from_df(df: &DataFrame) -> LabelTraderResult<Vec<DailyBar>> {
    let year = typed_column(df, DailyBarCol::Year, &DataType::Int32)?;
    let week = typed_column(df, DailyBarCol::WeekNumber, &DataType::UInt32)?;
    let open = typed_column(df, DailyBarCol::Open, &DataType::Float64)?;
    let close = typed_column(df, DailyBarCol::Close, &DataType::Float64)?;
    let label = typed_column(df, DailyBarCol::Classification, &DataType::String)?;

    let rows = izip!(
        year.i32()?.into_iter(),
        week.u32()?.into_iter(),
        open.f64()?.into_iter(),
        close.f64()?.into_iter(),
        label.str()?.into_iter(),
    );

    let mut bars = Vec::with_capacity(df.height());
    for (row, (year, week, open, close, label)) in rows.enumerate() {
        let year = required(year, row, DailyBarCol::Year)?;
        let week = required(week, row, DailyBarCol::WeekNumber)?;
        let open = required(open, row, DailyBarCol::Open)?;
        let close = required(close, row, DailyBarCol::Close)?;
        let label = required(label, row, DailyBarCol::Classification)?;

        let classification = Classification::parse_label(label).inspect_err(|e| {
            tracing::warn!(row, error = %e, "Rejected daily bar");
        })?;
        let bar = DailyBar::new(year, week, open, close, classification).inspect_err(|e| {
            tracing::warn!(row, error = %e, "Rejected daily bar");
        })?;
        bars.push(bar);
    }

    tracing::debug!(rows = bars.len(), "Loaded daily bars from data frame");
    Ok(bars)
}

fn typed_column(df: &DataFrame, col: DailyBarCol, dtype: &DataType) -> LabelTraderResult<Column> {
    let column = df
        .column(col.as_str())
        .map_err(|_| DataError::ColumnNotFound(col.to_string()))?;
    Ok(column.cast(dtype)?)
}

fn required<T>(value: Option<T>, row: usize, col: DailyBarCol) -> LabelTraderResult<T> {
    value.ok_or_else(|| {
        DataError::InvalidInput(format!("Missing or non-numeric '{col}' value in row {row}"))
            .into()
    })
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;
    use crate::{data::domain::Price, error::LabelTraderError};

    #[test]
    fn test_daily_bars_from_df() {
        let df = df![
            "Date" => &["2018-01-02", "2018-01-03", "2018-01-08"],
            "Year" => &[2018, 2018, 2018],
            "Week_Number" => &[1, 1, 2],
            "Open" => &[10.0, 11.0, 12.5],
            "Close" => &[11.0, 11.5, 12.0],
            "Classification" => &["GREEN", "RED", "red"],
        ]
        .expect("Failed to create daily bar DF");

        let bars = daily_bars_from_df(&df).expect("bars should load");

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].key().week, 1);
        assert_eq!(bars[0].classification(), Classification::Favorable);
        assert_eq!(bars[2].open(), Price(12.5));
        assert_eq!(bars[2].classification(), Classification::Unfavorable);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let df = df![
            "Year" => &[2018],
            "Week_Number" => &[1],
            "Open" => &[10.0],
            "Classification" => &["GREEN"],
        ]
        .expect("Failed to create DF");

        let err = daily_bars_from_df(&df).expect_err("Close is missing");
        assert!(matches!(
            err,
            LabelTraderError::Data(DataError::ColumnNotFound(ref c)) if c == "Close"
        ));
    }

    #[test]
    fn test_non_numeric_price_is_invalid_input() {
        let df = df![
            "Year" => &[2018, 2018],
            "Week_Number" => &[1, 1],
            "Open" => &["10.0", "n/a"],
            "Close" => &[11.0, 12.0],
            "Classification" => &["GREEN", "GREEN"],
        ]
        .expect("Failed to create DF");

        let err = daily_bars_from_df(&df).expect_err("second open is not numeric");
        assert!(matches!(err, LabelTraderError::Data(DataError::InvalidInput(_))));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_unknown_label_is_invalid_input() {
        let df = df![
            "Year" => &[2018],
            "Week_Number" => &[1],
            "Open" => &[10.0],
            "Close" => &[11.0],
            "Classification" => &["PURPLE"],
        ]
        .expect("Failed to create DF");

        let err = daily_bars_from_df(&df).expect_err("label is unknown");
        assert!(matches!(err, LabelTraderError::Data(DataError::InvalidInput(_))));
    }
}
