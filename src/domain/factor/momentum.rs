//! Momentum factor.
//!
//! MOM(L)[i] = C[i-1] / C[i-1-L] - 1
//! The trailing change is shifted one period forward so the value on date t
//! only uses closes through t-1. The first L+1 rows are dropped.

use crate::domain::series::{FactorSeries, Series};

pub const DEFAULT_LOOKBACK: usize = 90;

pub fn momentum(price: &Series, lookback: usize) -> FactorSeries {
    let changes = price.pct_change(lookback);
    let shifted: Vec<Option<f64>> = std::iter::once(None)
        .chain(changes.into_iter().take(price.len().saturating_sub(1)))
        .collect();
    Series::from_optional(&price.dates(), &shifted)
}
