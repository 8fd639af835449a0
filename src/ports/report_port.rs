//! Output port for cleaned tables and derived series.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::RiskPremiaError;
use crate::domain::factor::FactorComparison;
use crate::domain::ohlcv::PriceTable;

pub trait ReportPort {
    fn write_table(&mut self, table: &PriceTable) -> Result<(), RiskPremiaError>;

    /// `date,raw,cleaned`, one row per date present in either series.
    fn write_comparison(&mut self, comparison: &FactorComparison) -> Result<(), RiskPremiaError>;

    /// `date,position,strategy_return`, one row per return date.
    fn write_backtest(&mut self, result: &BacktestResult) -> Result<(), RiskPremiaError>;
}
