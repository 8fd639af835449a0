//! Median absolute deviation filter.
//!
//! Values further than `threshold * MAD` from the column median are replaced
//! by the median. A zero MAD means every value counts as an inlier.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::stats::median;

pub const DEFAULT_MAD_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianAbsoluteDeviation {
    pub threshold: f64,
}

impl Default for MedianAbsoluteDeviation {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MAD_THRESHOLD,
        }
    }
}

impl CleaningStrategy for MedianAbsoluteDeviation {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::MedianAbsoluteDeviation
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        let Some(med) = median(values) else {
            return values.to_vec();
        };
        let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
        let mad = median(&deviations).unwrap_or(0.0);
        if mad <= 0.0 {
            tracing::debug!("zero median absolute deviation, treating all values as inliers");
            return values.to_vec();
        }

        let limit = self.threshold * mad;
        values
            .iter()
            .zip(&deviations)
            .map(|(&v, &dev)| if dev > limit { med } else { v })
            .collect()
    }
}
