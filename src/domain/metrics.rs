//! Performance statistics over a strategy return series.

use crate::domain::series::Series;
use chrono::NaiveDate;

/// Crypto markets trade every calendar day.
pub const PERIODS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyMetrics {
    pub periods: usize,
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: i64,
    pub hit_rate: f64,
}

impl StrategyMetrics {
    pub fn compute(returns: &Series, risk_free_rate: f64) -> Self {
        let equity_curve = equity_curve(returns);
        let periods = returns.len();

        let final_equity = equity_curve.last().map(|p| p.equity).unwrap_or(1.0);
        let total_return = final_equity - 1.0;

        let years = periods as f64 / PERIODS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let values = returns.values();
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&equity_curve);
        let (annualized_volatility, sharpe_ratio, sortino_ratio) =
            compute_risk_adjusted(&values, risk_free_rate / PERIODS_PER_YEAR);

        let hit_rate = if periods > 0 {
            values.iter().filter(|&&r| r > 0.0).count() as f64 / periods as f64
        } else {
            0.0
        };

        StrategyMetrics {
            periods,
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            max_drawdown_duration,
            hit_rate,
        }
    }
}

/// Growth of one unit of capital compounded through `returns`.
pub fn equity_curve(returns: &Series) -> Vec<EquityPoint> {
    let mut equity = 1.0;
    returns
        .points
        .iter()
        .map(|p| {
            equity *= 1.0 + p.value;
            EquityPoint {
                date: p.date,
                equity,
            }
        })
        .collect()
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, i64) {
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

/// (annualized volatility, Sharpe, Sortino) from per-period returns.
fn compute_risk_adjusted(returns: &[f64], period_rf: f64) -> (f64, f64, f64) {
    if returns.len() < 2 {
        return (0.0, 0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let excess_return = mean - period_rf;
    let annualizer = PERIODS_PER_YEAR.sqrt();

    let sharpe = if stddev > 0.0 {
        (excess_return / stddev) * annualizer
    } else {
        0.0
    };

    let downside: f64 = returns
        .iter()
        .filter(|&&r| r < period_rf)
        .map(|&r| (r - period_rf).powi(2))
        .sum();
    let downside_stddev = (downside / n).sqrt();

    let sortino = if downside_stddev > 0.0 {
        (excess_return / downside_stddev) * annualizer
    } else {
        0.0
    };

    (stddev * annualizer, sharpe, sortino)
}
