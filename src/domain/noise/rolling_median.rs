//! Centered rolling median over `window` samples.
//!
//! Rows without a full window are back-filled then forward-filled.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::stats::{fill_or_keep, rolling_median_centered};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingMedian {
    pub window: usize,
}

impl RollingMedian {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }
}

impl CleaningStrategy for RollingMedian {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::RollingMedian
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        fill_or_keep(&rolling_median_centered(values, self.window), values)
    }
}
