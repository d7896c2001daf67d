use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    data::domain::BalancePoint,
    math::{BALANCE_DECIMAL_PLACES, round_dp},
};

/// Longest monotonic stretches of a balance history, counted in steps between adjacent points.
///
/// A flat step (two equal balances) ends whichever streak is in progress and starts neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    /// Most consecutive strictly increasing steps.
    pub max_increasing: usize,
    /// Most consecutive strictly decreasing steps.
    pub max_non_increasing: usize,
}

/// Scans adjacent balances and measures the longest rising and falling streaks.
///
/// Balances are compared at [`BALANCE_DECIMAL_PLACES`] fraction digits, whatever precision
/// the history was recorded with. Empty, single-point and constant histories yield `(0, 0)`.
pub fn analyze_streaks(history: &[BalancePoint]) -> Streaks {
    let mut streaks = Streaks::default();
    let (mut up, mut down) = (0usize, 0usize);

    for (prev, next) in history.iter().map(|p| compared(p.balance)).tuple_windows() {
        match next.partial_cmp(&prev) {
            Some(Ordering::Greater) => {
                up += 1;
                down = 0;
                streaks.max_increasing = streaks.max_increasing.max(up);
            }
            Some(Ordering::Less) => {
                down += 1;
                up = 0;
                streaks.max_non_increasing = streaks.max_non_increasing.max(down);
            }
            _ => {
                up = 0;
                down = 0;
            }
        }
    }

    streaks
}

fn compared(balance: f64) -> f64 {
    round_dp(balance, BALANCE_DECIMAL_PLACES).unwrap_or(balance)
}
