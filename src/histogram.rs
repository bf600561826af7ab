//! Equal-width bucketing and Gaussian kernel density, used by the renderer for
//! the movie duration chart.

use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split the observed range of `values` into `bins` equal-width buckets.
///
/// The last bucket is closed on both ends so the maximum is counted. A
/// single distinct value gets a unit-wide range centred on it.
pub fn equal_width(values: &[f64], bins: usize) -> Vec<Bucket> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = min_max(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }
    buckets
}

/// Gaussian kernel density estimate evaluated at `points` evenly spaced
/// positions across the observed range. Bandwidth follows Scott's rule.
///
/// Returns `(x, density)` pairs; empty when fewer than two distinct values
/// are present.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());
    let (lo, hi) = min_max(values);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
