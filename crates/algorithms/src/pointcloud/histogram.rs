//! Equal-width histograms of sampled values

use alsgrid_core::{Error, Result};

/// Equal-width histogram with fractional (weighted) bin counts
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges, ascending
    pub edges: Vec<f64>,
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which also takes `max`.
    /// When all values are equal the span `[v, v + 1]` is used.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::invalid_parameter("bins", 0, "must be at least 1"));
        }
        if values.is_empty() {
            return Err(Error::EmptyInput {
                operation: "histogram",
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid_parameter(
                "values",
                "non-finite",
                "histogram values must be finite",
            ));
        }

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi == lo {
            hi = lo + 1.0;
        }
        let width = (hi - lo) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0.0; bins];
        for &v in values {
            let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[bin] += 1.0;
        }

        Ok(Self { edges, counts })
    }

    /// Multiply every bin count by `factor`
    pub fn scaled(mut self, factor: f64) -> Self {
        self.counts.iter_mut().for_each(|c| *c *= factor);
        self
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Sum of all bin counts
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// `(lower edge, upper edge, count)` per bin
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(e, &c)| (e[0], e[1], c))
    }
}
