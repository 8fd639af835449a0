//! Low-volatility factor.
//!
//! LOWVOL(W)[i] = -STDEV(R[i-W+1..=i]) with R[i] = C[i]/C[i-1] - 1 and the
//! sample standard deviation. Lower realized volatility scores higher.
//! The first W rows are dropped.

use crate::domain::series::{FactorSeries, Series};
use crate::domain::stats::sample_std;

pub const DEFAULT_WINDOW: usize = 30;

pub fn low_volatility(price: &Series, window: usize) -> FactorSeries {
    let returns = price.pct_change(1);
    let window = window.max(1);

    let scores: Vec<Option<f64>> = (0..returns.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice: Option<Vec<f64>> = returns[i + 1 - window..=i].iter().copied().collect();
            slice.and_then(|r| sample_std(&r)).map(|sd| -sd)
        })
        .collect();

    Series::from_optional(&price.dates(), &scores)
}
