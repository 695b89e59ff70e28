//! Distribution summaries of generated integers.
//!
//! A [`DistributionSummary`] carries the data behind the usual views of a
//! small sample: the indexed series (line and scatter), a 20-bin histogram,
//! five-number box statistics and a Gaussian kernel-density curve. Summaries
//! serialize to JSON so any plotting tool can render them.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::method::Method;

/// Number of equal-width histogram bins.
pub const HISTOGRAM_BINS: usize = 20;

/// Number of points the density curve is evaluated at.
pub const DENSITY_POINTS: usize = 64;

/// Bandwidths of padding on each side of the density grid.
const DENSITY_CUT: f64 = 3.0;

/// One histogram bin, `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Five-number summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Summary of one named sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    /// Values in generation order.
    pub values: Vec<i64>,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); 0 for a single value.
    pub std_dev: f64,
    pub box_stats: BoxStats,
    pub histogram: Vec<HistogramBin>,
    /// Kernel bandwidth used for `density`.
    pub bandwidth: f64,
    pub density: Vec<DensityPoint>,
}

impl DistributionSummary {
    /// Summarise `values` under a free-form label.
    pub fn new(label: impl Into<String>, values: &[i64]) -> CoreResult<Self> {
        let label = label.into();
        if values.is_empty() {
            return Err(CoreError::EmptySample(label));
        }

        let data: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let mut sorted = data.clone();
        sorted.sort_by(f64::total_cmp);

        let (mean, std_dev) = mean_std(&data);
        let bandwidth = scott_bandwidth(std_dev, data.len());

        Ok(Self {
            count: values.len(),
            values: values.to_vec(),
            mean,
            std_dev,
            box_stats: box_stats(&sorted),
            histogram: histogram(&sorted, HISTOGRAM_BINS),
            bandwidth,
            density: density(&sorted, bandwidth, DENSITY_POINTS),
            method: None,
            label,
        })
    }

    /// Summarise the output of a generation method.
    pub fn for_method(method: Method, values: &[i64]) -> CoreResult<Self> {
        let mut summary = Self::new(method.label(), values)?;
        summary.method = Some(method);
        Ok(summary)
    }

    /// File-name stem: the method slug, or the label lowercased with
    /// non-alphanumerics collapsed to `_`.
    pub fn slug(&self) -> String {
        if let Some(method) = self.method {
            return method.slug().to_string();
        }
        let mut slug = String::with_capacity(self.label.len());
        for c in self.label.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let slug = slug.trim_matches('_');
        if slug.is_empty() {
            "summary".to_string()
        } else {
            slug.to_string()
        }
    }

    /// Write `<dir>/<slug>.json`, creating `dir` if needed.
    pub fn write_json(&self, dir: &Path) -> CoreResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", self.slug()));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), label = %self.label, "wrote distribution summary");
        Ok(path)
    }
}

fn mean_std(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    if data.len() < 2 {
        return (mean, 0.0);
    }
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn box_stats(sorted: &[f64]) -> BoxStats {
    BoxStats {
        min: sorted[0],
        q1: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q3: quantile(sorted, 0.75),
        max: sorted[sorted.len() - 1],
    }
}

fn histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &x in sorted {
        let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Scott's rule for one dimension: `σ · n^(−1/5)`. Degenerate samples fall
/// back to a unit bandwidth.
fn scott_bandwidth(std_dev: f64, n: usize) -> f64 {
    let h = std_dev * (n as f64).powf(-0.2);
    if h.is_finite() && h > 0.0 { h } else { 1.0 }
}

fn density(sorted: &[f64], bandwidth: f64, points: usize) -> Vec<DensityPoint> {
    let start = sorted[0] - DENSITY_CUT * bandwidth;
    let end = sorted[sorted.len() - 1] + DENSITY_CUT * bandwidth;
    let step = (end - start) / (points - 1) as f64;
    let norm = 1.0 / (sorted.len() as f64 * bandwidth * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = start + step * i as f64;
            let sum: f64 = sorted
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bandwidth).powi(2)).exp())
                .sum();
            DensityPoint {
                x,
                density: sum * norm,
            }
        })
        .collect()
}
