//! OHLCV bar and validated price table representation.

use crate::domain::error::RiskPremiaError;
use crate::domain::series::{Series, SeriesPoint};
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    pub fn get(&self, column: PriceColumn) -> f64 {
        match column {
            PriceColumn::Open => self.open,
            PriceColumn::High => self.high,
            PriceColumn::Low => self.low,
            PriceColumn::Close => self.close,
            PriceColumn::Volume => self.volume,
        }
    }

    fn set(&mut self, column: PriceColumn, value: f64) {
        match column {
            PriceColumn::Open => self.open = value,
            PriceColumn::High => self.high = value,
            PriceColumn::Low => self.low = value,
            PriceColumn::Close => self.close = value,
            PriceColumn::Volume => self.volume = value,
        }
    }
}

/// The five required columns of a price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 5] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::Volume,
    ];

    /// Columns touched by the full-table cleaning strategies.
    pub const PRICES: [PriceColumn; 4] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PriceColumn::Open => "Open",
            PriceColumn::High => "High",
            PriceColumn::Low => "Low",
            PriceColumn::Close => "Close",
            PriceColumn::Volume => "Volume",
        }
    }

    /// Case-insensitive header match.
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(header.trim()))
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-empty, strictly date-ordered table of finite OHLCV bars.
///
/// Construct through [`PriceTable::new`] or the series validator; the core
/// only ever derives new tables from an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    bars: Vec<OhlcvBar>,
}

/// Output of the noise reducer: same shape and date index as its input.
pub type CleanedPriceTable = PriceTable;

impl PriceTable {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, RiskPremiaError> {
        if bars.is_empty() {
            return Err(RiskPremiaError::data_shape("price table is empty"));
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(RiskPremiaError::data_shape(format!(
                    "date index is not strictly increasing at {}",
                    pair[1].date
                )));
            }
        }
        for bar in &bars {
            if let Some(col) = PriceColumn::ALL
                .into_iter()
                .find(|&c| !bar.get(c).is_finite())
            {
                return Err(RiskPremiaError::data_shape(format!(
                    "non-finite {} value on {}",
                    col, bar.date
                )));
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn column(&self, column: PriceColumn) -> Vec<f64> {
        self.bars.iter().map(|b| b.get(column)).collect()
    }

    /// Date-keyed view of one column.
    pub fn series(&self, column: PriceColumn) -> Series {
        Series::new(
            self.bars
                .iter()
                .map(|b| SeriesPoint {
                    date: b.date,
                    value: b.get(column),
                })
                .collect(),
        )
    }

    pub fn close(&self) -> Series {
        self.series(PriceColumn::Close)
    }

    /// Returns a copy with one column replaced. `values` must match the
    /// table length and hold finite numbers.
    pub(crate) fn with_column(&self, column: PriceColumn, values: &[f64]) -> PriceTable {
        debug_assert_eq!(values.len(), self.bars.len());
        let mut bars = self.bars.clone();
        for (bar, &v) in bars.iter_mut().zip(values) {
            bar.set(column, v);
        }
        PriceTable { bars }
    }
}
