//! Column statistics and gap handling shared by the noise reducer and the
//! factor engine.
//!
//! Gappy columns are `Vec<Option<f64>>`; `None` marks a value that was
//! either never computable (partial window) or flagged as an outlier.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between the two nearest order
/// statistics, `q` in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Centered rolling median. Row `i` covers
/// `[i - w/2, i + (w - 1 - w/2)]`; rows without a full window are `None`.
pub fn rolling_median_centered(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let n = values.len();
    let offset = (window - 1) / 2;

    (0..n)
        .map(|i| {
            let end = i + 1 + offset;
            if end > n || end < window {
                return None;
            }
            median(&values[end - window..end])
        })
        .collect()
}

/// Trailing rolling mean; the first `window - 1` rows are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(if i + 1 >= window {
            Some(sum / window as f64)
        } else {
            None
        });
    }
    out
}

/// Fills interior gaps by straight lines between the neighbouring known
/// values, treating rows as equally spaced. Leading and trailing gaps are
/// left alone.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut prev: Option<(usize, f64)> = None;

    for i in 0..values.len() {
        let Some(curr) = values[i] else { continue };
        if let Some((p, pv)) = prev {
            let span = (i - p) as f64;
            for (k, slot) in values.iter_mut().enumerate().take(i).skip(p + 1) {
                let t = (k - p) as f64 / span;
                *slot = Some(pv + (curr - pv) * t);
            }
        }
        prev = Some((i, curr));
    }
}

/// Back-fill then forward-fill. Returns `None` when every entry is a gap.
pub fn fill_edges(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let first = values.iter().flatten().next().copied()?;

    let mut out = Vec::with_capacity(values.len());
    let mut last = first;
    for v in values {
        if let Some(v) = v {
            last = *v;
        }
        out.push(last);
    }
    Some(out)
}

/// Edge-fills a cleaned column; a column with nothing computable keeps the
/// original values so the result never carries gaps.
pub fn fill_or_keep(cleaned: &[Option<f64>], original: &[f64]) -> Vec<f64> {
    match fill_edges(cleaned) {
        Some(filled) => filled,
        None => {
            tracing::debug!(len = original.len(), "no computable values, keeping column");
            original.to_vec()
        }
    }
}
