// 1. Traits
pub use crate::report::io::{Report, ReportName, ToCsv, ToJson, ToSchema};

// 2. The Core Pipeline
pub use crate::backtest::{Backtest, BacktestOutcome, YearlyOutcome};
pub use crate::sim::aggregate::aggregate_weeks;
pub use crate::sim::strategy::{StrategySimulator, make_trade, simulate};

// 3. Domain Types
pub use crate::data::domain::{BalancePoint, Classification, DailyBar, Price, WeekKey, WeeklyBar};
pub use crate::data::frame::{DailyBarCol, daily_bars_from_df};

// 4. Configurations
pub use crate::config::BacktestConfig;
pub use crate::data::filter::{FilterConfig, partition_by_year};

// 5. Reports
pub use crate::report::balance_history::{BalanceCol, BalanceHistory};
pub use crate::report::streaks::{Streaks, analyze_streaks};
pub use crate::report::summary::BalanceSummary;

// 6. Errors
pub use crate::error::{
    ConfigError, DataError, IoError, LabelTraderError, LabelTraderResult, SystemError,
};
