//! Data access port trait.
//!
//! Implementations hand back the table as ingested, nulls included; turning
//! it into a [`PriceTable`](crate::domain::ohlcv::PriceTable) is the
//! validator's job.

use crate::domain::error::RiskPremiaError;
use crate::domain::validation::RawTable;
use chrono::NaiveDate;

pub trait DataPort {
    /// Rows for `symbol` with dates inside the inclusive range; an open end
    /// means unbounded.
    fn fetch_table(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<RawTable, RiskPremiaError>;

    fn list_symbols(&self) -> Result<Vec<String>, RiskPremiaError>;
}
