//! Z-score clipping over the whole column.
//!
//! Values more than `threshold` sample standard deviations from the mean
//! become gaps, which are linearly interpolated and edge-filled. A column
//! with zero (or undefined) dispersion is left as is.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::stats::{fill_or_keep, interpolate_linear, mean, sample_std};

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreClip {
    pub threshold: f64,
}

impl Default for ZScoreClip {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

impl CleaningStrategy for ZScoreClip {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::ZScoreClip
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        let (Some(m), Some(sd)) = (mean(values), sample_std(values)) else {
            return values.to_vec();
        };
        if sd <= 0.0 {
            tracing::debug!("zero standard deviation, treating all values as inliers");
            return values.to_vec();
        }

        let mut gappy: Vec<Option<f64>> = values
            .iter()
            .map(|&v| (((v - m) / sd).abs() <= self.threshold).then_some(v))
            .collect();
        interpolate_linear(&mut gappy);
        fill_or_keep(&gappy, values)
    }
}
