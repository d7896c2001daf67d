use crate::{
    config::BacktestConfig,
    data::domain::{BalancePoint, Price, WeeklyBar},
    error::{DataError, LabelTraderResult},
    math::{BALANCE_DECIMAL_PLACES, round_dp},
};

/// Starting cash of a simulation unless configured otherwise.
pub const DEFAULT_INITIAL_BALANCE: f64 = 100.0;

/// Value of a long position opened with `cash` at `open` and closed at `close`.
///
/// # Errors
/// Returns `DataError::InvalidInput` if `open` is not a positive finite price.
pub fn make_trade(cash: f64, open: Price, close: Price) -> LabelTraderResult<f64> {
    if !(open.0.is_finite() && open.0 > 0.0) {
        return Err(DataError::InvalidInput(format!(
            "Cannot enter a position at open price {open}"
        ))
        .into());
    }
    let shares = cash / open.0;
    Ok(shares * close.0)
}

/// What one scan step of the simulator did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionStep {
    /// The balance is zero; nothing can be traded.
    Broke,
    /// The week under the cursor is not favorable; cash is held.
    Hold,
    /// A run of favorable weeks was traded as one position.
    Trade,
}

/// Replays a weekly label strategy over an ordered sequence of [`WeeklyBar`]s.
///
/// Each decision step either holds cash through one non-favorable week or buys at the open of a
/// contiguous favorable run and sells at the close of its last week. One [`BalancePoint`] is
/// recorded per step, at the last week the step covered.
///
/// The final week is never the start of a step. A favorable run that starts earlier may still
/// extend into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySimulator {
    initial_balance: f64,
    decimal_places: u32,
}

impl Default for StrategySimulator {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            decimal_places: BALANCE_DECIMAL_PLACES,
        }
    }
}

impl From<&BacktestConfig> for StrategySimulator {
    fn from(cfg: &BacktestConfig) -> Self {
        Self {
            initial_balance: cfg.initial_balance,
            decimal_places: cfg.balance_decimal_places,
        }
    }
}

impl StrategySimulator {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            ..Default::default()
        }
    }

    pub fn with_decimal_places(self, decimal_places: u32) -> Self {
        Self {
            decimal_places,
            ..self
        }
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Runs the strategy and returns the balance history.
    ///
    /// An empty or single-week input yields an empty history.
    ///
    /// # Errors
    /// Returns `DataError::InvalidInput` if the initial balance is negative or not finite, or
    /// if a traded run opens at a non-positive price.
    #[tracing::instrument(
        skip(self, weeks),
        fields(weeks = weeks.len(), initial_balance = self.initial_balance)
    )]
    pub fn run(&self, weeks: &[WeeklyBar]) -> LabelTraderResult<Vec<BalancePoint>> {
        if !(self.initial_balance.is_finite() && self.initial_balance >= 0.0) {
            return Err(DataError::InvalidInput(format!(
                "Initial balance must be a non-negative finite amount, got {}",
                self.initial_balance
            ))
            .into());
        }

        let mut history = Vec::new();
        let Some(last_idx) = weeks.len().checked_sub(1) else {
            return Ok(history);
        };

        let mut balance = self.initial_balance;
        let mut cursor = 0;
        while cursor < last_idx {
            let (step, end) = if balance == 0.0 {
                (DecisionStep::Broke, cursor)
            } else {
                let run_len = weeks[cursor..]
                    .iter()
                    .take_while(|w| w.classification.is_favorable())
                    .count();

                if run_len == 0 {
                    (DecisionStep::Hold, cursor)
                } else {
                    let end = cursor + run_len - 1;
                    balance = make_trade(balance, weeks[cursor].open, weeks[end].close)?;
                    (DecisionStep::Trade, end)
                }
            };

            let at = &weeks[end];
            let point = BalancePoint {
                year: at.year(),
                week: at.week(),
                balance: round_dp(balance, self.decimal_places)?,
            };
            tracing::trace!(
                ?step,
                weeks = end + 1 - cursor,
                week = %at.key,
                balance = point.balance,
                "Decision step"
            );
            history.push(point);

            cursor = end + 1;
        }

        tracing::debug!(steps = history.len(), final_balance = balance, "Simulation finished");
        Ok(history)
    }
}

/// Runs [`StrategySimulator`] with the given starting cash and default rounding.
pub fn simulate(weeks: &[WeeklyBar], initial_balance: f64) -> LabelTraderResult<Vec<BalancePoint>> {
    StrategySimulator::new(initial_balance).run(weeks)
}
