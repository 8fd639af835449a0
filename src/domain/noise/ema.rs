//! Exponential moving average of Close.
//!
//! alpha = 2/(span+1). Bias-adjusted form, defined from the first sample:
//! EMA[t] = sum((1-alpha)^i * C[t-i]) / sum((1-alpha)^i) for i in 0..=t.

use super::{CleaningMethod, CleaningStrategy};
use crate::domain::ohlcv::PriceColumn;

pub const DEFAULT_SPAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    pub span: usize,
}

impl Default for Ema {
    fn default() -> Self {
        Self { span: DEFAULT_SPAN }
    }
}

impl CleaningStrategy for Ema {
    fn method(&self) -> CleaningMethod {
        CleaningMethod::Ema
    }

    fn targets(&self) -> &'static [PriceColumn] {
        &[PriceColumn::Close]
    }

    fn clean_column(&self, values: &[f64]) -> Vec<f64> {
        let alpha = 2.0 / (self.span.max(1) as f64 + 1.0);
        let decay = 1.0 - alpha;
        let mut num = 0.0;
        let mut den = 0.0;

        values
            .iter()
            .map(|&v| {
                num = v + decay * num;
                den = 1.0 + decay * den;
                num / den
            })
            .collect()
    }
}
