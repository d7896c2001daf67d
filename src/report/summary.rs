use polars::prelude::{DataFrame, IntoLazy, PlSmallStr, col};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{DataError, LabelTraderError, LabelTraderResult},
    math::{BALANCE_DECIMAL_PLACES, round_dp},
    report::{
        balance_history::{BalanceCol, BalanceHistory},
        io::Report,
    },
};

/// Descriptive statistics of a balance history.
///
/// All values are rounded to two fraction digits. `std_dev` is the sample standard deviation
/// and is `None` when fewer than two balances exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub final_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum SummaryStat {
    Mean,
    StdDev,
    Min,
    Max,
    FinalBalance,
}

impl From<SummaryStat> for PlSmallStr {
    fn from(value: SummaryStat) -> Self {
        let name: &'static str = value.into();
        name.into()
    }
}

impl TryFrom<&BalanceHistory> for BalanceSummary {
    type Error = LabelTraderError;

    fn try_from(history: &BalanceHistory) -> LabelTraderResult<Self> {
        if history.is_empty() {
            return Err(DataError::EmptyInput(
                "Cannot summarize an empty balance history".to_string(),
            )
            .into());
        }

        let balance = col(BalanceCol::Balance);
        let stats = history
            .as_df()
            .clone()
            .lazy()
            .select([
                balance.clone().mean().alias(SummaryStat::Mean),
                balance.clone().std(1).alias(SummaryStat::StdDev),
                balance.clone().min().alias(SummaryStat::Min),
                balance.clone().max().alias(SummaryStat::Max),
                balance.last().alias(SummaryStat::FinalBalance),
            ])
            .collect()?;

        Ok(Self {
            mean: required_stat(&stats, SummaryStat::Mean)?,
            std_dev: stat(&stats, SummaryStat::StdDev)?
                .filter(|v| v.is_finite())
                .map(|v| round_dp(v, BALANCE_DECIMAL_PLACES))
                .transpose()?,
            min: required_stat(&stats, SummaryStat::Min)?,
            max: required_stat(&stats, SummaryStat::Max)?,
            final_balance: required_stat(&stats, SummaryStat::FinalBalance)?,
        })
    }
}

fn stat(stats: &DataFrame, which: SummaryStat) -> LabelTraderResult<Option<f64>> {
    let name: &'static str = which.into();
    Ok(stats.column(name)?.f64()?.get(0))
}

fn required_stat(stats: &DataFrame, which: SummaryStat) -> LabelTraderResult<f64> {
    let value = stat(stats, which)?
        .ok_or_else(|| DataError::DataFrame(format!("Summary statistic '{which}' is null")))?;
    round_dp(value, BALANCE_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::domain::BalancePoint;

    fn history(balances: &[f64]) -> BalanceHistory {
        let points = balances
            .iter()
            .enumerate()
            .map(|(i, &balance)| BalancePoint {
                year: 2018,
                week: i as u32 + 1,
                balance,
            })
            .collect();
        BalanceHistory::new(points).expect("history")
    }

    #[test]
    fn test_summary_statistics() {
        let summary = history(&[100.0, 120.0, 110.0, 130.0]).summary().expect("summary");

        assert_eq!(summary.mean, 115.0);
        // sample variance = (225 + 25 + 25 + 225) / 3
        assert_eq!(summary.std_dev, Some(12.91));
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 130.0);
        assert_eq!(summary.final_balance, 130.0);
    }

    #[test]
    fn test_single_point_has_no_std_dev() {
        let summary = history(&[42.0]).summary().expect("summary");

        assert_eq!(summary.mean, 42.0);
        assert_eq!(summary.std_dev, None);
        assert_eq!(summary.final_balance, 42.0);
    }

    #[test]
    fn test_empty_history_is_rejected() {
        let err = history(&[]).summary().expect_err("empty");
        assert!(matches!(err, LabelTraderError::Data(DataError::EmptyInput(_))));
    }
}
