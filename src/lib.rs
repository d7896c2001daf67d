pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod math;
pub mod prelude;
pub mod report;
pub mod sim;

pub use backtest::{Backtest, BacktestOutcome, YearlyOutcome};
pub use config::BacktestConfig;
pub use error::{LabelTraderError, LabelTraderResult};
