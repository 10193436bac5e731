//! Descriptive statistics over score lists
//!
//! Every helper returns 0 for empty input rather than failing.

use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic mean
///
/// ```
/// use alchemy_core::metrics::mean;
/// assert_eq!(mean(&[2.0, 4.0]), 3.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0 below two values
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Nearest-rank percentile: element `⌊n·p/100⌋` of the sorted list, clamped
///
/// ```
/// use alchemy_core::metrics::percentile;
/// assert_eq!(percentile(&[40.0, 10.0, 30.0, 20.0], 25.0), 20.0);
/// assert_eq!(percentile(&[1.0, 2.0], 100.0), 2.0);
/// ```
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let index = (sorted.len() as f64 * p / 100.0).floor().max(0.0) as usize;
    sorted[index.min(sorted.len() - 1)]
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Map `score` from `[min, max]` onto 0-1; equal bounds give 0.5
///
/// ```
/// use alchemy_core::metrics::normalize;
/// assert_eq!(normalize(75.0, 0.0, 100.0), 0.75);
/// assert_eq!(normalize(3.0, 5.0, 5.0), 0.5);
/// ```
pub fn normalize(score: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    (score - min) / (max - min)
}

/// Map `value` from one range onto another; a degenerate source range gives `new_min`
pub fn normalize_range(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    if old_max == old_min {
        return new_min;
    }
    new_min + (value - old_min) / (old_max - old_min) * (new_max - new_min)
}

/// Pearson correlation; 0 on length mismatch, fewer than two points, or zero variance
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        va += (x - ma).powi(2);
        vb += (y - mb).powi(2);
    }
    if va == 0.0 || vb == 0.0 {
        return 0.0;
    }
    cov / (va * vb).sqrt()
}

/// Simpson diversity `1 - Σ (n/N)²`
///
/// ```
/// use alchemy_core::metrics::diversity_index;
/// use std::collections::BTreeMap;
/// let dist = BTreeMap::from([("leader", 1), ("analyst", 1)]);
/// assert_eq!(diversity_index(&dist), 0.5);
/// ```
pub fn diversity_index<K>(distribution: &BTreeMap<K, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return 0.0;
    }
    1.0 - distribution
        .values()
        .map(|&count| (count as f64 / total as f64).powi(2))
        .sum::<f64>()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub p25: f64,
    pub p75: f64,
}

pub fn team_metrics(scores: &[f64]) -> TeamMetrics {
    if scores.is_empty() {
        return TeamMetrics::default();
    }
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    TeamMetrics {
        mean: mean(scores),
        median: median(scores),
        std_dev: std_dev(scores),
        min,
        max,
        range: max - min,
        p25: percentile(scores, 25.0),
        p75: percentile(scores, 75.0),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub sum: f64,
    pub avg: f64,
    pub count: usize,
}

/// Sum, average and count of `value_key` grouped by `category_key`
///
/// Records missing either key, or with a non-numeric value, are skipped.
pub fn aggregate_by_category(
    records: &[serde_json::Value],
    category_key: &str,
    value_key: &str,
) -> BTreeMap<String, CategoryAggregate> {
    let mut out: BTreeMap<String, CategoryAggregate> = BTreeMap::new();
    for record in records {
        let category = match record.get(category_key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => continue,
            Some(other) => other.to_string(),
        };
        let Some(value) = record.get(value_key).and_then(serde_json::Value::as_f64) else {
            continue;
        };
        let entry = out.entry(category).or_default();
        entry.sum += value;
        entry.count += 1;
    }
    for entry in out.values_mut() {
        entry.avg = entry.sum / entry.count as f64;
    }
    out
}

/// Keep entries `>= threshold` (or `<=` when `above` is false)
pub fn filter_by_threshold(
    data: &BTreeMap<String, f64>,
    threshold: f64,
    above: bool,
) -> BTreeMap<String, f64> {
    data.iter()
        .filter(|(_, &v)| if above { v >= threshold } else { v <= threshold })
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[5.0]), 0.0);
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_edges() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 0.0), 1.0);
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 50.0), 2.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(normalize_range(5.0, 2.0, 2.0, 10.0, 100.0), 10.0);
    }

    #[test]
    fn test_correlation() {
        assert!((correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(correlation(&[1.0], &[1.0]), 0.0);
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_diversity_index_edges() {
        let empty: BTreeMap<&str, usize> = BTreeMap::new();
        assert_eq!(diversity_index(&empty), 0.0);
        assert_eq!(diversity_index(&BTreeMap::from([("a", 4)])), 0.0);
    }

    #[test]
    fn test_team_metrics() {
        let metrics = team_metrics(&[60.0, 80.0, 70.0, 90.0]);
        assert_eq!(metrics.mean, 75.0);
        assert_eq!(metrics.median, 75.0);
        assert_eq!(metrics.min, 60.0);
        assert_eq!(metrics.max, 90.0);
        assert_eq!(metrics.range, 30.0);
        assert_eq!(metrics.p25, 70.0);
        assert_eq!(metrics.p75, 90.0);
        assert_eq!(team_metrics(&[]), TeamMetrics::default());
    }

    #[test]
    fn test_aggregate_by_category() {
        let records = vec![
            json!({"category": "focus", "score": 80}),
            json!({"category": "focus", "score": 60}),
            json!({"category": "energy", "score": 50.5}),
            json!({"category": "energy"}),
            json!({"score": 10}),
        ];
        let agg = aggregate_by_category(&records, "category", "score");
        assert_eq!(agg.len(), 2);
        assert_eq!(agg["focus"].sum, 140.0);
        assert_eq!(agg["focus"].avg, 70.0);
        assert_eq!(agg["focus"].count, 2);
        assert_eq!(agg["energy"].count, 1);
    }

    #[test]
    fn test_filter_by_threshold() {
        let data = BTreeMap::from([
            ("a".to_string(), 10.0),
            ("b".to_string(), 50.0),
            ("c".to_string(), 90.0),
        ]);
        assert_eq!(filter_by_threshold(&data, 50.0, true).len(), 2);
        let below = filter_by_threshold(&data, 50.0, false);
        assert!(below.contains_key("a") && below.contains_key("b"));
    }
}
