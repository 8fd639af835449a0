//! Noise reduction for price tables.
//!
//! Seven interchangeable cleaning strategies, selected by [`CleaningMethod`]:
//! - `RollingMedian`, `ZScoreClip`, `MinMaxClip`, `MedianAbsoluteDeviation`
//!   clean Open, High, Low and Close.
//! - `Ema` and `Sma` smooth Close only; the other columns pass through.
//! - `None` returns the input unchanged.
//!
//! Volume is never modified. Every strategy preserves the date index and
//! leaves no gaps in the columns it touches.

pub mod ema;
pub mod mad;
pub mod minmax;
pub mod rolling_median;
pub mod sma;
pub mod zscore;

use crate::domain::error::RiskPremiaError;
use crate::domain::ohlcv::{CleanedPriceTable, PriceColumn, PriceTable};
use std::fmt;
use std::str::FromStr;

pub use ema::Ema;
pub use mad::MedianAbsoluteDeviation;
pub use minmax::MinMaxClip;
pub use rolling_median::RollingMedian;
pub use sma::Sma;
pub use zscore::ZScoreClip;

pub const DEFAULT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CleaningMethod {
    #[default]
    None,
    RollingMedian,
    ZScoreClip,
    Ema,
    Sma,
    MinMaxClip,
    MedianAbsoluteDeviation,
}

impl CleaningMethod {
    pub const ALL: [CleaningMethod; 7] = [
        CleaningMethod::None,
        CleaningMethod::RollingMedian,
        CleaningMethod::ZScoreClip,
        CleaningMethod::Ema,
        CleaningMethod::Sma,
        CleaningMethod::MinMaxClip,
        CleaningMethod::MedianAbsoluteDeviation,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            CleaningMethod::None => "none",
            CleaningMethod::RollingMedian => "rolling_median",
            CleaningMethod::ZScoreClip => "zscore_clip",
            CleaningMethod::Ema => "ema",
            CleaningMethod::Sma => "sma",
            CleaningMethod::MinMaxClip => "minmax_clip",
            CleaningMethod::MedianAbsoluteDeviation => "median_absolute_deviation",
        }
    }

    /// Builds the strategy object for this method. `window` is used by the
    /// rolling methods only.
    pub fn strategy(self, window: usize) -> Box<dyn CleaningStrategy> {
        match self {
            CleaningMethod::None => Box::new(Passthrough),
            CleaningMethod::RollingMedian => Box::new(RollingMedian::new(window)),
            CleaningMethod::ZScoreClip => Box::new(ZScoreClip::default()),
            CleaningMethod::Ema => Box::new(Ema::default()),
            CleaningMethod::Sma => Box::new(Sma::new(window)),
            CleaningMethod::MinMaxClip => Box::new(MinMaxClip::default()),
            CleaningMethod::MedianAbsoluteDeviation => {
                Box::new(MedianAbsoluteDeviation::default())
            }
        }
    }
}

impl fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CleaningMethod {
    type Err = RiskPremiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(needle))
            .ok_or_else(|| RiskPremiaError::UnsupportedMethod {
                name: needle.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseConfig {
    pub method: CleaningMethod,
    pub window: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            method: CleaningMethod::None,
            window: DEFAULT_WINDOW,
        }
    }
}

/// A column-wise cleaning transform over a price table.
pub trait CleaningStrategy {
    fn method(&self) -> CleaningMethod;

    /// Columns this strategy rewrites; all others pass through.
    fn targets(&self) -> &'static [PriceColumn] {
        &PriceColumn::PRICES
    }

    /// Cleans one column. The result has the same length and no gaps.
    fn clean_column(&self, values: &[f64]) -> Vec<f64>;

    fn apply(&self, table: &PriceTable) -> CleanedPriceTable {
        self.targets().iter().fold(table.clone(), |acc, &column| {
            let cleaned = self.clean_column(&table.column(column));
            acc.with_column(column, &cleaned)
        })
    }
}

/// The `none` method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl CleaningStrategy for Passthrough {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::None
    }

    fn targets(&self) -> &'static [PriceColumn] {
        &[]
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }

    fn apply(&self, table: &PriceTable) -> CleanedPriceTable {
        table.clone()
    }
}

pub fn clean(table: &PriceTable, method: CleaningMethod, window: usize) -> CleanedPriceTable {
    tracing::debug!(%method, window, rows = table.len(), "cleaning price table");
    method.strategy(window).apply(table)
}

/// String-tagged entry point. An unrecognised tag is a passthrough, not an
/// error; use [`CleaningMethod::from_str`] where a strict parse is wanted.
pub fn clean_by_tag(table: &PriceTable, tag: &str, window: usize) -> CleanedPriceTable {
    match tag.parse::<CleaningMethod>() {
        Ok(method) => clean(table, method, window),
        Err(_) => {
            tracing::warn!(tag, "unknown cleaning method, returning input unchanged");
            table.clone()
        }
    }
}
