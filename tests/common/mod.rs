#![allow(dead_code)]

use chrono::NaiveDate;
use riskpremia::domain::error::RiskPremiaError;
pub use riskpremia::domain::ohlcv::{OhlcvBar, PriceTable};
use riskpremia::domain::validation::RawTable;
use riskpremia::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, RawTable>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: &[OhlcvBar]) -> Self {
        let table = PriceTable::new(bars.to_vec()).unwrap();
        self.data.insert(symbol.to_string(), RawTable::from(&table));
        self
    }

    pub fn with_raw(mut self, symbol: &str, raw: RawTable) -> Self {
        self.data.insert(symbol.to_string(), raw);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_table(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<RawTable, RiskPremiaError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(RiskPremiaError::Data {
                reason: reason.clone(),
            });
        }
        let raw = self.data.get(symbol).ok_or_else(|| RiskPremiaError::Data {
            reason: format!("no data for {}", symbol),
        })?;

        let mut filtered = RawTable::new(raw.columns.clone());
        for row in &raw.rows {
            if start_date.is_some_and(|s| row.date < s) || end_date.is_some_and(|e| row.date > e) {
                continue;
            }
            filtered.push(row.date, row.values.clone());
        }
        Ok(filtered)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RiskPremiaError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume,
    }
}

/// Daily bars from `closes`, starting at `start_date`.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close * 0.995,
            high: close * 1.01,
            low: close * 0.98,
            close,
            volume: 10_000.0 + (i % 5) as f64 * 500.0,
        })
        .collect()
}

/// A wavy upward drift, enough variation for every factor to be non-trivial.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| {
            let t = i as f64;
            start_price * (1.0 + 0.002 * t) + (t * 0.9).sin() * start_price * 0.03
        })
        .collect();
    bars_from_closes(start_date, &closes)
}

pub fn table_from_closes(closes: &[f64]) -> PriceTable {
    PriceTable::new(bars_from_closes("2024-01-01", closes)).unwrap()
}
