//! Date-keyed float series and alignment helpers.
//!
//! A [`Series`] is the common output shape of every factor and of the
//! backtester: an ordered list of `(date, value)` points with strictly
//! increasing dates and finite values. Undefined rows are dropped rather
//! than stored as NaN.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

pub type FactorSeries = Series;
pub type StrategyReturnSeries = Series;

impl Series {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn from_pairs(dates: &[NaiveDate], values: &[f64]) -> Self {
        Self::new(
            dates
                .iter()
                .zip(values)
                .map(|(&date, &value)| SeriesPoint { date, value })
                .collect(),
        )
    }

    /// Builds a series from a possibly-gappy column, dropping `None` and
    /// non-finite entries.
    pub fn from_optional(dates: &[NaiveDate], values: &[Option<f64>]) -> Self {
        Self::new(
            dates
                .iter()
                .zip(values)
                .filter_map(|(&date, v)| match v {
                    Some(value) if value.is_finite() => Some(SeriesPoint {
                        date,
                        value: *value,
                    }),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Period-over-period fractional change, keyed on this series' own
    /// ordering. The first `periods` rows have no prior value and yield
    /// `None`, as does a division by zero.
    pub fn pct_change(&self, periods: usize) -> Vec<Option<f64>> {
        pct_change(&self.values(), periods)
    }

    /// Running sum of the values.
    pub fn cumulative_sum(&self) -> Series {
        let mut acc = 0.0;
        Series::new(
            self.points
                .iter()
                .map(|p| {
                    acc += p.value;
                    SeriesPoint {
                        date: p.date,
                        value: acc,
                    }
                })
                .collect(),
        )
    }
}

pub fn pct_change(values: &[f64], periods: usize) -> Vec<Option<f64>> {
    let periods = periods.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, &curr)| {
            if i < periods {
                return None;
            }
            let prev = values[i - periods];
            let change = curr / prev - 1.0;
            change.is_finite().then_some(change)
        })
        .collect()
}

/// Inner join of two date-ordered series: only dates present in both
/// survive, in ascending order.
pub fn inner_join(a: &Series, b: &Series) -> Vec<(NaiveDate, f64, f64)> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.points.len() && j < b.points.len() {
        let (pa, pb) = (a.points[i], b.points[j]);
        match pa.date.cmp(&pb.date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((pa.date, pa.value, pb.value));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Outer join of two date-ordered series, for side-by-side output.
pub fn outer_join(a: &Series, b: &Series) -> Vec<(NaiveDate, Option<f64>, Option<f64>)> {
    let mut out = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    loop {
        match (a.points.get(i), b.points.get(j)) {
            (Some(pa), Some(pb)) => match pa.date.cmp(&pb.date) {
                std::cmp::Ordering::Less => {
                    out.push((pa.date, Some(pa.value), None));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push((pb.date, None, Some(pb.value)));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push((pa.date, Some(pa.value), Some(pb.value)));
                    i += 1;
                    j += 1;
                }
            },
            (Some(pa), None) => {
                out.push((pa.date, Some(pa.value), None));
                i += 1;
            }
            (None, Some(pb)) => {
                out.push((pb.date, None, Some(pb.value)));
                j += 1;
            }
            (None, None) => break,
        }
    }
    out
}

/// A flat series at `level` over the given dates.
pub fn constant_series(dates: &[NaiveDate], level: f64) -> Series {
    Series::new(
        dates
            .iter()
            .map(|&date| SeriesPoint { date, value: level })
            .collect(),
    )
}
