//! Two-factor combined-signal backtest.
//!
//! signal[t]   = w_a * A[t] + w_b * B[t] on dates common to both factors
//! position[t] = sign(signal[t]); a zero signal keeps the previous
//!               position, and +1 before any non-zero signal
//! return[t]   = position[t] * (C[t+1] / C[t] - 1)
//! Dates without a next close are dropped. Weights are applied as given.

use crate::domain::series::{inner_join, Series, SeriesPoint, StrategyReturnSeries};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub a: f64,
    pub b: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self { a: 0.5, b: 0.5 }
    }
}

impl From<(f64, f64)> for FactorWeights {
    fn from((a, b): (f64, f64)) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BacktestConfig {
    pub weights: FactorWeights,
    /// Annual rate used by the Sharpe and Sortino ratios.
    pub risk_free_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Long,
    Short,
}

impl Position {
    pub fn sign(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPoint {
    pub date: NaiveDate,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestResult {
    pub signal: Series,
    pub positions: Vec<PositionPoint>,
    pub returns: StrategyReturnSeries,
}

pub fn combine_signals(factor_a: &Series, factor_b: &Series, weights: FactorWeights) -> Series {
    Series::new(
        inner_join(factor_a, factor_b)
            .into_iter()
            .map(|(date, a, b)| SeriesPoint {
                date,
                value: weights.a * a + weights.b * b,
            })
            .collect(),
    )
}

/// Sign of each signal value with zeros forward-filled. A non-finite signal
/// has no sign and resets to long.
pub fn infer_positions(signal: &Series) -> Vec<PositionPoint> {
    let mut current = Position::Long;
    signal
        .points
        .iter()
        .map(|p| {
            if !p.value.is_finite() {
                current = Position::Long;
            } else if p.value > 0.0 {
                current = Position::Long;
            } else if p.value < 0.0 {
                current = Position::Short;
            }
            PositionPoint {
                date: p.date,
                position: current,
            }
        })
        .collect()
}

/// Return from each close to the next one, keyed on the earlier date.
pub fn forward_returns(price: &Series) -> Series {
    Series::new(
        price
            .points
            .windows(2)
            .filter_map(|w| {
                let r = w[1].value / w[0].value - 1.0;
                r.is_finite().then_some(SeriesPoint {
                    date: w[0].date,
                    value: r,
                })
            })
            .collect(),
    )
}

pub fn run_backtest(
    price: &Series,
    factor_a: &Series,
    factor_b: &Series,
    weights: FactorWeights,
) -> BacktestResult {
    let signal = combine_signals(factor_a, factor_b, weights);
    let positions = infer_positions(&signal);
    let forward = forward_returns(price);

    let returns = Series::new(
        positions
            .iter()
            .filter_map(|p| {
                forward.get(p.date).map(|r| SeriesPoint {
                    date: p.date,
                    value: p.position.sign() * r,
                })
            })
            .collect(),
    );

    tracing::debug!(
        signal_days = signal.len(),
        return_days = returns.len(),
        "backtest complete"
    );

    BacktestResult {
        signal,
        positions,
        returns,
    }
}

pub fn backtest(
    price: &Series,
    factor_a: &Series,
    factor_b: &Series,
    weights: FactorWeights,
) -> StrategyReturnSeries {
    run_backtest(price, factor_a, factor_b, weights).returns
}
