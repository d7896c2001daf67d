use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    data::filter::FilterConfig,
    error::{ConfigError, IoError, LabelTraderResult},
    math::BALANCE_DECIMAL_PLACES,
    sim::strategy::DEFAULT_INITIAL_BALANCE,
};

/// Upper bound for the reporting precision of balances.
const MAX_DECIMAL_PLACES: u32 = 10;

/// Configuration of a weekly label backtest.
///
/// # Example
/// ```
/// # use label_trader::prelude::*;
/// let cfg = BacktestConfig::default()
///     .with_initial_balance(250.0)
///     .with_filter_config(FilterConfig {
///         allowed_years: Some([2018, 2019].into_iter().collect()),
///     });
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Cash available before the first decision step.
    pub initial_balance: f64,

    /// Fraction digits reported balances are rounded to.
    pub balance_decimal_places: u32,

    /// Restricts which weeks enter the simulation.
    pub filter: FilterConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            balance_decimal_places: BALANCE_DECIMAL_PLACES,
            filter: FilterConfig::default(),
        }
    }
}

impl BacktestConfig {
    pub fn with_initial_balance(self, initial_balance: f64) -> Self {
        Self {
            initial_balance,
            ..self
        }
    }

    pub fn with_balance_decimal_places(self, balance_decimal_places: u32) -> Self {
        Self {
            balance_decimal_places,
            ..self
        }
    }

    pub fn with_filter_config(self, filter: FilterConfig) -> Self {
        Self { filter, ..self }
    }

    /// Checks the configuration for values the simulator cannot work with.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidConfig` if the initial balance is negative or not finite,
    /// if the precision exceeds ten fraction digits, or if the year allowlist is empty.
    pub fn validate(&self) -> LabelTraderResult<()> {
        if !(self.initial_balance.is_finite() && self.initial_balance >= 0.0) {
            return Err(ConfigError::InvalidConfig(format!(
                "initial_balance must be a non-negative finite amount, got {}",
                self.initial_balance
            ))
            .into());
        }

        if self.balance_decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::InvalidConfig(format!(
                "balance_decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.balance_decimal_places
            ))
            .into());
        }

        if self
            .filter
            .allowed_years
            .as_ref()
            .is_some_and(|years| years.is_empty())
        {
            return Err(ConfigError::InvalidConfig(
                "filter.allowed_years is empty; use null to allow every year".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Parses and validates a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> LabelTraderResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(IoError::Json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LabelTraderResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            IoError::FileSystem(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::error::LabelTraderError;

    #[test]
    fn test_defaults_match_reporting_conventions() {
        let cfg = BacktestConfig::default();

        assert_eq!(cfg.initial_balance, 100.0);
        assert_eq!(cfg.balance_decimal_places, 2);
        assert!(cfg.filter.is_unrestricted());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_json_fills_missing_fields_with_defaults() {
        let cfg = BacktestConfig::from_json_str(r#"{ "filter": { "allowed_years": [2019] } }"#)
            .expect("config should parse");

        assert_eq!(cfg.initial_balance, 100.0);
        assert_eq!(cfg.filter.allowed_years, Some(BTreeSet::from([2019])));
    }

    #[test]
    fn test_json_round_trips() {
        let cfg = BacktestConfig::default()
            .with_initial_balance(42.5)
            .with_balance_decimal_places(4);

        let json = serde_json::to_string(&cfg).expect("serialize");
        let back = BacktestConfig::from_json_str(&json).expect("deserialize");

        assert_eq!(back, cfg);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            BacktestConfig::default().with_initial_balance(-5.0),
            BacktestConfig::default().with_initial_balance(f64::NAN),
            BacktestConfig::default().with_balance_decimal_places(11),
            BacktestConfig::default().with_filter_config(FilterConfig {
                allowed_years: Some(BTreeSet::new()),
            }),
        ];

        for cfg in cases {
            let err = cfg.validate().expect_err("config should be rejected");
            assert!(matches!(err, LabelTraderError::Config(ConfigError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_malformed_json_is_an_io_error() {
        let err = BacktestConfig::from_json_str("{ not json").expect_err("malformed");
        assert!(matches!(err, LabelTraderError::Io(IoError::Json(_))));
    }

    #[test]
    fn test_reads_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("backtest.json");
        fs::write(&path, r#"{ "initial_balance": 1000.0 }"#).expect("write config");

        let cfg = BacktestConfig::from_json_file(&path).expect("config should load");
        assert_eq!(cfg.initial_balance, 1000.0);

        let missing = BacktestConfig::from_json_file(dir.path().join("missing.json"));
        assert!(missing.is_err());
    }
}
