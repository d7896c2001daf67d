use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::domain::WeeklyBar;

/// Configuration for restricting which weeks enter a backtest.
///
/// # Usage
/// `None` disables the filter, meaning all data passes through.
///
/// # Example
/// ```
/// # use label_trader::prelude::*;
/// let config = FilterConfig {
///     allowed_years: Some([2018, 2019].into_iter().collect()),
/// };
/// assert!(config.allows_year(2018));
/// assert!(!config.allows_year(2017));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    /// Allowlist of calendar years (e.g., 2018).
    ///
    /// - `None`: All years are permitted.
    /// - `Some(years)`: Only weeks from these years are retained.
    pub allowed_years: Option<BTreeSet<i32>>,
}

impl FilterConfig {
    /// Returns true if no filters are active (all data allowed).
    pub fn is_unrestricted(&self) -> bool {
        self.allowed_years.is_none()
    }

    pub fn allows_year(&self, year: i32) -> bool {
        self.allowed_years
            .as_ref()
            .is_none_or(|years| years.contains(&year))
    }

    /// Keeps the weeks that pass the filter, in their original order.
    pub fn apply(&self, weeks: &[WeeklyBar]) -> Vec<WeeklyBar> {
        weeks
            .iter()
            .filter(|w| self.allows_year(w.year()))
            .copied()
            .collect()
    }
}

/// Splits an ordered weekly sequence into one sequence per year.
///
/// Years appear in first-seen order and weeks keep their relative order; nothing is re-sorted.
pub fn partition_by_year(weeks: &[WeeklyBar]) -> IndexMap<i32, Vec<WeeklyBar>> {
    let mut partitions: IndexMap<i32, Vec<WeeklyBar>> = IndexMap::new();
    for week in weeks {
        partitions.entry(week.year()).or_default().push(*week);
    }
    partitions
}
