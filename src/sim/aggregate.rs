use indexmap::{IndexMap, map::Entry};

use crate::data::domain::{DailyBar, WeekKey, WeeklyBar};

/// Collapses labeled daily bars into one bar per `(year, week)`.
///
/// Groups are emitted in first-seen order. Within a group the open and the classification come
/// from the first bar in input order and the close from the last one. Bars of the same week that
/// are not adjacent in the input still land in the same group.
pub fn aggregate_weeks(bars: &[DailyBar]) -> Vec<WeeklyBar> {
    let mut weeks: IndexMap<WeekKey, WeeklyBar> = IndexMap::with_capacity(bars.len() / 5 + 1);

    for bar in bars {
        match weeks.entry(bar.key()) {
            Entry::Occupied(mut entry) => entry.get_mut().close = bar.close(),
            Entry::Vacant(entry) => {
                entry.insert(WeeklyBar {
                    key: bar.key(),
                    open: bar.open(),
                    close: bar.close(),
                    classification: bar.classification(),
                });
            }
        }
    }

    tracing::debug!(days = bars.len(), weeks = weeks.len(), "Aggregated daily bars into weeks");
    weeks.into_values().collect()
}
