use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    config::BacktestConfig,
    data::{
        domain::{DailyBar, WeeklyBar},
        filter::partition_by_year,
    },
    error::LabelTraderResult,
    report::{balance_history::BalanceHistory, streaks::Streaks, summary::BalanceSummary},
    sim::{aggregate::aggregate_weeks, strategy::StrategySimulator},
};

/// Everything a single strategy run produced.
#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    weeks: Vec<WeeklyBar>,
    history: BalanceHistory,
    streaks: Streaks,
    summary: Option<BalanceSummary>,
}

impl BacktestOutcome {
    /// The weekly bars the simulator consumed.
    pub fn weeks(&self) -> &[WeeklyBar] {
        &self.weeks
    }

    pub fn history(&self) -> &BalanceHistory {
        &self.history
    }

    pub fn streaks(&self) -> Streaks {
        self.streaks
    }

    /// `None` when the run produced no balance points.
    pub fn summary(&self) -> Option<BalanceSummary> {
        self.summary
    }
}

/// Outcome of the run restricted to one calendar year.
#[derive(Debug, Clone)]
pub struct YearlyOutcome {
    pub year: i32,
    pub outcome: BacktestOutcome,
}

/// Drives the weekly label strategy from labeled daily bars to reports.
#[derive(Debug, Clone)]
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    /// # Errors
    /// Returns `ConfigError::InvalidConfig` if the configuration does not validate.
    pub fn new(config: BacktestConfig) -> LabelTraderResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Aggregates, filters and simulates the whole input as one account.
    #[tracing::instrument(skip(self, bars), fields(days = bars.len()))]
    pub fn run(&self, bars: &[DailyBar]) -> LabelTraderResult<BacktestOutcome> {
        let weeks = self.config.filter.apply(&aggregate_weeks(bars));
        self.evaluate(weeks, None)
    }

    /// Aggregates the whole input, then simulates every year as a separate account.
    ///
    /// Years are evaluated in parallel and returned in first-seen order.
    #[tracing::instrument(skip(self, bars), fields(days = bars.len()))]
    pub fn run_by_year(&self, bars: &[DailyBar]) -> LabelTraderResult<Vec<YearlyOutcome>> {
        let weeks = self.config.filter.apply(&aggregate_weeks(bars));
        let partitions: Vec<(i32, Vec<WeeklyBar>)> =
            partition_by_year(&weeks).into_iter().collect();

        partitions
            .into_par_iter()
            .map(|(year, weeks)| {
                let outcome = self.evaluate(weeks, Some(year.to_string()))?;
                tracing::info!(
                    year,
                    steps = outcome.history.points().len(),
                    final_balance = ?outcome.history.final_balance(),
                    "Yearly backtest finished"
                );
                Ok(YearlyOutcome { year, outcome })
            })
            .collect()
    }

    fn evaluate(
        &self,
        weeks: Vec<WeeklyBar>,
        label: Option<String>,
    ) -> LabelTraderResult<BacktestOutcome> {
        let points = StrategySimulator::from(&self.config).run(&weeks)?;

        let mut history = BalanceHistory::new(points)?;
        if let Some(label) = label {
            history = history.with_label(label);
        }

        let streaks = history.streaks();
        let summary = if history.is_empty() {
            None
        } else {
            Some(history.summary()?)
        };

        Ok(BacktestOutcome {
            weeks,
            history,
            streaks,
            summary,
        })
    }
}
