//! Trailing simple moving average of Close over `window` samples.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::ohlcv::PriceColumn;
use crate::domain::stats::{fill_or_keep, rolling_mean};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    pub window: usize,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }
}

impl CleaningStrategy for Sma {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::Sma
    }

    fn targets(&self) -> &'static [PriceColumn] {
        &[PriceColumn::Close]
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        fill_or_keep(&rolling_mean(values, self.window), values)
    }
}
