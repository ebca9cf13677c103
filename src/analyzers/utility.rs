use crate::error::{AnalysisError, AnalysisResult};

/// Computes the q-th quantile (0.0-1.0) of pre-sorted values, linearly
/// interpolating between the two nearest order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Assigns each value to one of `bins` equal-population buckets (0 = lowest).
///
/// Edges sit at evenly spaced quantiles. Bucket `i` holds values in
/// `(edge[i], edge[i + 1]]`; the first bucket also takes `edge[0]`.
/// Fails when the edges collapse, i.e. too many repeated values to form
/// `bins` distinct buckets.
pub fn quantile_buckets(
    column: &'static str,
    values: &[f64],
    bins: usize,
) -> AnalysisResult<Vec<u8>> {
    if values.is_empty() {
        return Err(AnalysisError::degenerate(column, "no values to bin"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let edges: Vec<f64> = (0..=bins)
        .map(|i| quantile(&sorted, i as f64 / bins as f64))
        .collect();

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(AnalysisError::degenerate(
            column,
            format!("bin edges must be unique, got {edges:?}"),
        ));
    }

    Ok(values
        .iter()
        .map(|v| {
            edges[1..]
                .iter()
                .position(|edge| v <= edge)
                .unwrap_or(bins - 1) as u8
        })
        .collect())
}

/// Counts values into `bins` equal-width bins spanning `[min, max]`.
///
/// Returns `(lower_edge, count)` pairs plus the bin width. When every value is
/// equal the whole sample lands in a single unit-wide bin centred on it.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<(f64, usize)>, f64) {
    if values.is_empty() || bins == 0 {
        return (Vec::new(), 0.0);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return (vec![(min - 0.5, values.len())], 1.0);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let out = counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (min + i as f64 * width, c))
        .collect();
    (out, width)
}
