//! Series validation: turns an ingested raw table into a [`PriceTable`].
//!
//! The raw table mirrors what an acquisition collaborator hands over: named
//! columns with nullable cells. Validation resolves the five required
//! columns, drops rows with a null in any of them, orders the rows by date
//! and fails with [`RiskPremiaError::DataShape`] when nothing usable is left.

use crate::domain::error::RiskPremiaError;
use crate::domain::ohlcv::{OhlcvBar, PriceColumn, PriceTable};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, values: Vec<Option<f64>>) {
        self.rows.push(RawRow { date, values });
    }
}

impl From<&PriceTable> for RawTable {
    fn from(table: &PriceTable) -> Self {
        let columns = PriceColumn::ALL.iter().map(|c| c.name().to_string()).collect();
        let rows = table
            .bars()
            .iter()
            .map(|bar| RawRow {
                date: bar.date,
                values: PriceColumn::ALL.iter().map(|&c| Some(bar.get(c))).collect(),
            })
            .collect();
        Self { columns, rows }
    }
}

pub fn validate(raw: &RawTable) -> Result<PriceTable, RiskPremiaError> {
    let indices = resolve_columns(&raw.columns)?;

    let mut bars: Vec<OhlcvBar> = raw
        .rows
        .iter()
        .filter_map(|row| {
            let cell = |i: usize| {
                row.values
                    .get(indices[i])
                    .copied()
                    .flatten()
                    .filter(|v| v.is_finite())
            };
            Some(OhlcvBar {
                date: row.date,
                open: cell(0)?,
                high: cell(1)?,
                low: cell(2)?,
                close: cell(3)?,
                volume: cell(4)?,
            })
        })
        .collect();

    let dropped = raw.rows.len() - bars.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = bars.len(), "dropped rows with null values");
    }

    if bars.is_empty() {
        return Err(RiskPremiaError::data_shape(
            "table is empty after dropping rows with null values",
        ));
    }

    bars.sort_by_key(|b| b.date);
    PriceTable::new(bars)
}

/// Positions of Open, High, Low, Close, Volume in `columns`.
fn resolve_columns(columns: &[String]) -> Result<[usize; 5], RiskPremiaError> {
    let mut indices = [0usize; 5];
    let mut missing = Vec::new();

    for (slot, column) in PriceColumn::ALL.iter().enumerate() {
        match columns
            .iter()
            .position(|h| PriceColumn::from_header(h) == Some(*column))
        {
            Some(i) => indices[slot] = i,
            None => missing.push(column.name()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(RiskPremiaError::data_shape(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}
