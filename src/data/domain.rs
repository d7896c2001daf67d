use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{DataError, LabelTraderResult};

// ================================================================================================
// Primitive Domain Types
// ================================================================================================

/// Represents a price level in the quote currency.
///
/// Used for daily and weekly Open and Close prices.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Price(pub f64);

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The per-day trading signal attached to a labeled bar.
///
/// Source data labels favorable days `GREEN` and everything else `RED`.
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
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Classification {
    #[strum(to_string = "GREEN", serialize = "favorable")]
    #[serde(rename = "GREEN", alias = "favorable")]
    Favorable,
    #[strum(to_string = "RED", serialize = "unfavorable")]
    #[serde(rename = "RED", alias = "unfavorable")]
    Unfavorable,
}

impl Classification {
    pub fn is_favorable(&self) -> bool {
        matches!(self, Self::Favorable)
    }

    /// Parses a raw label, reporting unknown values as invalid input.
    pub fn parse_label(label: &str) -> LabelTraderResult<Self> {
        label.trim().parse::<Self>().map_err(|_| {
            DataError::InvalidInput(format!("Unknown classification label: '{label}'")).into()
        })
    }
}

/// The `(year, week number)` pair that identifies a trading week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

// ================================================================================================
// Bars
// ================================================================================================

/// One labeled trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBar {
    key: WeekKey,
    open: Price,
    close: Price,
    classification: Classification,
}

impl DailyBar {
    /// Creates a validated daily bar.
    ///
    /// # Errors
    /// Returns `DataError::InvalidInput` if the week number is 0 or either price is NaN,
    /// infinite or negative.
    /// A zero open price is accepted here; it is rejected once it is used as a trade divisor.
    pub fn new(
        year: i32,
        week: u32,
        open: f64,
        close: f64,
        classification: Classification,
    ) -> LabelTraderResult<Self> {
        let key = WeekKey { year, week };
        if week == 0 {
            return Err(DataError::InvalidInput(format!(
                "Week numbers start at 1, got 0 in year {year}"
            ))
            .into());
        }
        validate_price(key, "open", open)?;
        validate_price(key, "close", close)?;

        Ok(Self {
            key,
            open: Price(open),
            close: Price(close),
            classification,
        })
    }

    pub fn key(&self) -> WeekKey {
        self.key
    }

    pub fn open(&self) -> Price {
        self.open
    }

    pub fn close(&self) -> Price {
        self.close
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }
}

fn validate_price(key: WeekKey, field: &str, value: f64) -> LabelTraderResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DataError::InvalidInput(format!(
            "Invalid {field} price {value} in week {key}"
        ))
        .into());
    }
    Ok(())
}

/// One aggregated trading week.
///
/// The classification is the one of the first day in the week; it is inherited, not recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBar {
    pub key: WeekKey,
    pub open: Price,
    pub close: Price,
    pub classification: Classification,
}

impl WeeklyBar {
    pub fn year(&self) -> i32 {
        self.key.year
    }

    pub fn week(&self) -> u32 {
        self.key.week
    }
}

/// One entry of a simulated balance history.
///
/// `balance` is already rounded to the reporting precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub year: i32,
    pub week: u32,
    pub balance: f64,
}

impl BalancePoint {
    pub fn key(&self) -> WeekKey {
        WeekKey {
            year: self.year,
            week: self.week,
        }
    }
}
