use std::sync::Arc;

use polars::{
    df,
    frame::DataFrame,
    prelude::{DataType, Field, PlSmallStr, Schema, SchemaRef},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    data::domain::BalancePoint,
    error::LabelTraderResult,
    report::{
        io::{Report, ReportName, ToSchema},
        streaks::{Streaks, analyze_streaks},
        summary::BalanceSummary,
    },
};

/// Columns of the balance history report.
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
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BalanceCol {
    /// Calendar year of the week a decision step ended in.
    Year,
    /// Week number of the week a decision step ended in.
    TradingWeek,
    /// Account balance after the step, rounded to the reporting precision.
    Balance,
}

impl From<BalanceCol> for PlSmallStr {
    fn from(value: BalanceCol) -> Self {
        value.as_str().into()
    }
}

impl BalanceCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// The simulated balance history together with its tabular view.
#[derive(Debug, Clone)]
pub struct BalanceHistory {
    label: Option<String>,
    points: Vec<BalancePoint>,
    df: DataFrame,
}

impl BalanceHistory {
    pub fn new(points: Vec<BalancePoint>) -> LabelTraderResult<Self> {
        let year: Vec<i32> = points.iter().map(|p| p.year).collect();
        let week: Vec<u32> = points.iter().map(|p| p.week).collect();
        let balance: Vec<f64> = points.iter().map(|p| p.balance).collect();

        let df = df![
            BalanceCol::Year.as_str() => year,
            BalanceCol::TradingWeek.as_str() => week,
            BalanceCol::Balance.as_str() => balance,
        ]?;

        Ok(Self {
            label: None,
            points,
            df,
        })
    }

    /// Prefixes the report file name, e.g. `2018_balance_history.csv`.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }

    pub fn points(&self) -> &[BalancePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.points.last().map(|p| p.balance)
    }

    pub fn streaks(&self) -> Streaks {
        analyze_streaks(&self.points)
    }

    pub fn summary(&self) -> LabelTraderResult<BalanceSummary> {
        self.try_into()
    }
}

impl Report for BalanceHistory {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl ReportName for BalanceHistory {
    fn base_name(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}_balance_history"),
            None => "balance_history".to_string(),
        }
    }
}

impl ToSchema for BalanceHistory {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = BalanceCol::iter()
            .map(|col| {
                let dtype = match col {
                    BalanceCol::Year => DataType::Int32,
                    BalanceCol::TradingWeek => DataType::UInt32,
                    BalanceCol::Balance => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::io::{ToCsv, ToJson};

    fn sample() -> BalanceHistory {
        BalanceHistory::new(vec![
            BalancePoint {
                year: 2018,
                week: 1,
                balance: 120.0,
            },
            BalancePoint {
                year: 2018,
                week: 2,
                balance: 120.0,
            },
            BalancePoint {
                year: 2018,
                week: 5,
                balance: 132.5,
            },
        ])
        .expect("history")
    }

    fn assert_schema(df: &DataFrame) {
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["year", "trading_week", "balance"]);

        let want: Vec<DataType> = BalanceHistory::to_schema().iter_values().cloned().collect();
        assert_eq!(df.dtypes(), want);
    }

    #[test]
    fn test_frame_matches_schema() {
        let history = sample();

        assert_schema(history.as_df());
        assert_eq!(history.as_df().height(), 3);
        assert_eq!(history.final_balance(), Some(132.5));
    }

    #[test]
    fn test_empty_history_has_schema_and_no_rows() {
        let history = BalanceHistory::new(Vec::new()).expect("history");

        assert!(history.is_empty());
        assert_eq!(history.as_df().height(), 0);
        assert_schema(history.as_df());
        assert_eq!(history.final_balance(), None);
    }

    #[test]
    fn test_label_prefixes_base_name() {
        assert_eq!(sample().base_name(), "balance_history");
        assert_eq!(sample().with_label("2018").base_name(), "2018_balance_history");
    }

    #[test]
    fn test_to_json() {
        let have = sample().to_json().expect("json");
        let want = serde_json::json!([
            { "year": 2018, "trading_week": 1, "balance": 120.0 },
            { "year": 2018, "trading_week": 2, "balance": 120.0 },
            { "year": 2018, "trading_week": 5, "balance": 132.5 },
        ]);
        assert_eq!(have, want);
    }

    #[test]
    fn test_to_csv() {
        let tmp = tempfile::tempdir().expect("tempdir");
        sample().with_label("2018").to_csv(tmp.path()).expect("csv");

        let written = std::fs::read_to_string(tmp.path().join("2018_balance_history.csv"))
            .expect("read back");
        assert_eq!(written.lines().next(), Some("year,trading_week,balance"));
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn test_streaks_delegate_to_analyzer() {
        let streaks = sample().streaks();
        assert_eq!(streaks.max_increasing, 1);
        assert_eq!(streaks.max_non_increasing, 0);
    }
}
