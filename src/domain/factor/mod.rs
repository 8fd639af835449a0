//! Factor engine.
//!
//! Four independent, pure factor functions over date-keyed series:
//! - [`momentum`]: trailing change, shifted one period forward
//! - [`low_volatility`]: negated rolling standard deviation of returns
//! - [`market_risk_premium`]: price return in excess of a risk-free return
//! - [`nvt_ratio`]: price over transaction volume
//!
//! [`FactorKind`] names a factor together with its parameters so callers can
//! compute the same factor on a raw and a cleaned table side by side.

pub mod low_volatility;
pub mod market_premium;
pub mod momentum;
pub mod nvt;

pub use low_volatility::low_volatility;
pub use market_premium::market_risk_premium;
pub use momentum::momentum;
pub use nvt::{nvt_ratio, tx_volume_proxy};

use crate::domain::ohlcv::PriceTable;
use crate::domain::series::{constant_series, FactorSeries};
use std::fmt;

pub const DEFAULT_RISK_FREE_LEVEL: f64 = 1.0;

/// Parameters shared by every factor computation in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorParams {
    pub momentum_lookback: usize,
    pub low_vol_window: usize,
    pub nvt_volume_window: usize,
    pub risk_free: f64,
}

impl Default for FactorParams {
    fn default() -> Self {
        Self {
            momentum_lookback: momentum::DEFAULT_LOOKBACK,
            low_vol_window: low_volatility::DEFAULT_WINDOW,
            nvt_volume_window: nvt::DEFAULT_VOLUME_WINDOW,
            risk_free: DEFAULT_RISK_FREE_LEVEL,
        }
    }
}

impl FactorParams {
    pub fn momentum(&self) -> FactorKind {
        FactorKind::Momentum {
            lookback: self.momentum_lookback,
        }
    }

    pub fn low_volatility(&self) -> FactorKind {
        FactorKind::LowVolatility {
            window: self.low_vol_window,
        }
    }

    pub fn market_risk_premium(&self) -> FactorKind {
        FactorKind::MarketRiskPremium {
            risk_free: self.risk_free,
        }
    }

    pub fn nvt_ratio(&self) -> FactorKind {
        FactorKind::NvtRatio {
            volume_window: self.nvt_volume_window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorKind {
    Momentum { lookback: usize },
    LowVolatility { window: usize },
    MarketRiskPremium { risk_free: f64 },
    NvtRatio { volume_window: usize },
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKind::Momentum { lookback } => write!(f, "MOMENTUM({})", lookback),
            FactorKind::LowVolatility { window } => write!(f, "LOWVOL({})", window),
            FactorKind::MarketRiskPremium { risk_free } => write!(f, "MRP({})", risk_free),
            FactorKind::NvtRatio { volume_window } => write!(f, "NVT({})", volume_window),
        }
    }
}

impl FactorKind {
    /// Computes this factor on a table's close. The risk-free leg is a flat
    /// series on the table's dates, and NVT divides by the rolling volume
    /// proxy of `volume_source`.
    pub fn compute(&self, table: &PriceTable, volume_source: &PriceTable) -> FactorSeries {
        let close = table.close();
        match *self {
            FactorKind::Momentum { lookback } => momentum(&close, lookback),
            FactorKind::LowVolatility { window } => low_volatility(&close, window),
            FactorKind::MarketRiskPremium { risk_free } => {
                market_risk_premium(&close, &constant_series(&table.dates(), risk_free))
            }
            FactorKind::NvtRatio { volume_window } => {
                nvt_ratio(&close, &tx_volume_proxy(volume_source, volume_window))
            }
        }
    }
}

/// One factor computed on both the raw and the cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorComparison {
    pub kind: FactorKind,
    pub raw: FactorSeries,
    pub cleaned: FactorSeries,
}

impl FactorComparison {
    /// The volume proxy always comes from the raw table.
    pub fn compute(kind: FactorKind, raw: &PriceTable, cleaned: &PriceTable) -> Self {
        Self {
            kind,
            raw: kind.compute(raw, raw),
            cleaned: kind.compute(cleaned, raw),
        }
    }
}
