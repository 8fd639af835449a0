//! Market risk premium.
//!
//! MRP[t] = R_price[t] - R_riskfree[t], each return taken on its own series
//! and the two aligned by date. Dates missing from either side, and each
//! series' first row, are dropped.

use crate::domain::series::{inner_join, FactorSeries, Series, SeriesPoint};

pub fn market_risk_premium(price: &Series, risk_free: &Series) -> FactorSeries {
    let price_returns = Series::from_optional(&price.dates(), &price.pct_change(1));
    let rf_returns = Series::from_optional(&risk_free.dates(), &risk_free.pct_change(1));

    Series::new(
        inner_join(&price_returns, &rf_returns)
            .into_iter()
            .map(|(date, p, rf)| SeriesPoint {
                date,
                value: p - rf,
            })
            .collect(),
    )
}
