//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`. The first column holds the
//! date (`YYYY-MM-DD`, an optional time suffix is ignored); every other
//! header becomes a raw column. Empty cells and `NaN`/`null`/`NA` read as
//! nulls. Only the OHLCV columns must hold numbers; a non-numeric cell in
//! any other column reads as a null.

use crate::domain::error::RiskPremiaError;
use crate::domain::ohlcv::PriceColumn;
use crate::domain::validation::RawTable;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, RiskPremiaError> {
    let day = raw.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| RiskPremiaError::Data {
        reason: format!("invalid date '{}': {}", raw, e),
    })
}

fn parse_cell(raw: &str, column: &str) -> Result<Option<f64>, RiskPremiaError> {
    let cell = raw.trim();
    if cell.is_empty()
        || cell.eq_ignore_ascii_case("nan")
        || cell.eq_ignore_ascii_case("null")
        || cell.eq_ignore_ascii_case("na")
    {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| RiskPremiaError::Data {
            reason: format!("invalid {} value '{}': {}", column, cell, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_table(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<RawTable, RiskPremiaError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| RiskPremiaError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| RiskPremiaError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        if headers.is_empty() {
            return Err(RiskPremiaError::Data {
                reason: "missing date column".into(),
            });
        }

        let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
        let required: Vec<bool> = columns
            .iter()
            .map(|h| PriceColumn::from_header(h).is_some())
            .collect();
        let mut table = RawTable::new(columns.clone());

        for result in rdr.records() {
            let record = result.map_err(|e| RiskPremiaError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| RiskPremiaError::Data {
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str)?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let values = columns
                .iter()
                .enumerate()
                .map(|(i, name)| match record.get(i + 1) {
                    Some(cell) if required[i] => parse_cell(cell, name),
                    Some(cell) => Ok(parse_cell(cell, name).ok().flatten()),
                    None => Ok(None),
                })
                .collect::<Result<Vec<_>, _>>()?;

            table.push(date, values);
        }

        tracing::debug!(symbol, rows = table.rows.len(), path = %path.display(), "loaded csv");
        Ok(table)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RiskPremiaError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RiskPremiaError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| RiskPremiaError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
