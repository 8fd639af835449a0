//! Network value to transactions ratio.
//!
//! NVT[t] = C[t] / TX[t] on dates present in both inputs. Dates where the
//! quotient is undefined (zero volume) are dropped.

use crate::domain::ohlcv::{PriceColumn, PriceTable};
use crate::domain::series::{inner_join, FactorSeries, Series, SeriesPoint};
use crate::domain::stats::{fill_or_keep, rolling_mean};

pub const DEFAULT_VOLUME_WINDOW: usize = 7;

pub fn nvt_ratio(price: &Series, tx_volume: &Series) -> FactorSeries {
    Series::new(
        inner_join(price, tx_volume)
            .into_iter()
            .filter_map(|(date, p, tx)| {
                let ratio = p / tx;
                (tx != 0.0 && ratio.is_finite()).then_some(SeriesPoint { date, value: ratio })
            })
            .collect(),
    )
}

/// Transaction volume proxy: trailing rolling mean of traded volume,
/// back-filled over the warmup rows.
pub fn tx_volume_proxy(table: &PriceTable, window: usize) -> Series {
    let volume = table.column(PriceColumn::Volume);
    let smoothed = fill_or_keep(&rolling_mean(&volume, window), &volume);
    Series::from_pairs(&table.dates(), &smoothed)
}
