//! Per-branch dropout trend over academic years.

use std::collections::BTreeMap;

// Slope magnitudes at or below this threshold classify as "stable".
const SLOPE_THRESHOLD: f64 = 0.01;

/// Classify a regression slope into a trend label.
pub(crate) fn trend_label(slope: f64) -> &'static str {
    if slope > SLOPE_THRESHOLD {
        "increasing"
    } else if slope < -SLOPE_THRESHOLD {
        "decreasing"
    } else {
        "stable"
    }
}

/// Mean value per academic year, ascending by year label.
///
/// Rows with a null year are excluded; null values within a year are
/// skipped. Years left with no valid observations are omitted so the fit
/// never sees a hole.
pub(crate) fn per_year_means(
    years: &[Option<String>],
    values: &[Option<f64>],
) -> Vec<(String, f64)> {
    let mut buckets: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for (year, value) in years.iter().zip(values.iter()) {
        let (Some(year), Some(value)) = (year, value) else {
            continue;
        };
        let bucket = buckets.entry(year.as_str()).or_insert((0.0, 0));
        bucket.0 += value;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(year, (sum, count))| (year.to_string(), sum / count as f64))
        .collect()
}
