// Chart-sink payload: labeled (year, balance) series plus a JSON artifact
// writer for headless runs. Interactive rendering lives in the ui module.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// A labeled mass-balance series, ready to become a chart dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSeries {
    pub label: String,

    /// (year, balance) pairs in ascending year order.
    pub points: Vec<(i32, f64)>,
}

impl BalanceSeries {
    pub fn new(label: impl Into<String>, points: Vec<(i32, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last year covered, if the series has points.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Smallest and largest balance value, if the series has points.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |range, &(_, value)| {
            Some(match range {
                None => (value, value),
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
            })
        })
    }
}

/// Year bounds across several series.
pub fn combined_year_range(series: &[BalanceSeries]) -> Option<(i32, i32)> {
    series
        .iter()
        .filter_map(BalanceSeries::year_range)
        .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
}

/// Value bounds across several series.
pub fn combined_value_range(series: &[BalanceSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .filter_map(BalanceSeries::value_range)
        .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
}

/// Writes the series to `path` as a pretty-printed JSON artifact.
pub fn write_series_json(path: &Path, series: &[BalanceSeries]) -> Result<()> {
    let json = serde_json::to_string_pretty(series).context("Failed to serialize chart series")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write chart artifact {}", path.display()))?;
    Ok(())
}
