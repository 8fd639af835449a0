//! Percentile winsorization: clip each column to its [1st, 99th] percentile.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::stats::quantile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxClip {
    pub lower: f64,
    pub upper: f64,
}

impl Default for MinMaxClip {
    fn default() -> Self {
        Self {
            lower: 0.01,
            upper: 0.99,
        }
    }
}

impl CleaningStrategy for MinMaxClip {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::MinMaxClip
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        let (Some(lo), Some(hi)) = (quantile(values, self.lower), quantile(values, self.upper))
        else {
            return values.to_vec();
        };
        values.iter().map(|&v| v.max(lo).min(hi)).collect()
    }
}
