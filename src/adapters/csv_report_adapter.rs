//! CSV writer for cleaned tables, factor comparisons and backtest results.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::RiskPremiaError;
use crate::domain::factor::FactorComparison;
use crate::domain::ohlcv::{PriceColumn, PriceTable};
use crate::domain::series::outer_join;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub struct CsvReportAdapter<W: Write> {
    writer: csv::Writer<W>,
}

fn csv_error(e: csv::Error) -> RiskPremiaError {
    RiskPremiaError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl<W: Write> CsvReportAdapter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(self) -> Result<W, RiskPremiaError> {
        self.writer.into_inner().map_err(|e| RiskPremiaError::Io(e.into_error()))
    }

    fn row<I, S>(&mut self, fields: I) -> Result<(), RiskPremiaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer.write_record(fields).map_err(csv_error)
    }
}

impl<W: Write> ReportPort for CsvReportAdapter<W> {
    fn write_table(&mut self, table: &PriceTable) -> Result<(), RiskPremiaError> {
        let header: Vec<&str> = std::iter::once("Date")
            .chain(PriceColumn::ALL.iter().map(|c| c.name()))
            .collect();
        self.row(header)?;

        for bar in table.bars() {
            let fields: Vec<String> = std::iter::once(bar.date.to_string())
                .chain(PriceColumn::ALL.iter().map(|&c| bar.get(c).to_string()))
                .collect();
            self.row(fields)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_comparison(&mut self, comparison: &FactorComparison) -> Result<(), RiskPremiaError> {
        self.row(["date", "raw", "cleaned"])?;
        for (date, raw, cleaned) in outer_join(&comparison.raw, &comparison.cleaned) {
            self.row([date.to_string(), cell(raw), cell(cleaned)])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_backtest(&mut self, result: &BacktestResult) -> Result<(), RiskPremiaError> {
        self.row(["date", "position", "strategy_return"])?;
        // return dates are an ordered subset of position dates
        let mut positions = result.positions.iter();
        for point in &result.returns.points {
            let position = positions
                .find(|p| p.date == point.date)
                .map(|p| p.position.sign());
            self.row([point.date.to_string(), cell(position), point.value.to_string()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
