//! Local point density estimation
//!
//! Counts neighbors within a fixed radius around a uniform subsample of
//! the points and converts the counts to points per unit area (2D) or
//! volume (3D).

use crate::maybe_rayon::*;
use crate::pointcloud::histogram::Histogram;
use crate::spatial::{KdTree, Metric};
use alsgrid_core::{Algorithm, Error, Point, PointSet, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How neighborhoods are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DensityMode {
    /// Points per square unit in a horizontal disc (z ignored)
    #[default]
    Planar,
    /// Points per cubic unit in a ball
    Volumetric,
}

impl DensityMode {
    /// Area or volume of a neighborhood of the given radius
    pub fn neighborhood_measure(self, radius: f64) -> f64 {
        match self {
            DensityMode::Planar => PI * radius * radius,
            DensityMode::Volumetric => 4.0 / 3.0 * PI * radius * radius * radius,
        }
    }

    pub fn metric(self) -> Metric {
        match self {
            DensityMode::Planar => Metric::Planar,
            DensityMode::Volumetric => Metric::Euclidean,
        }
    }

    /// Unit label, e.g. `pts/m²`
    pub fn unit(self) -> &'static str {
        match self {
            DensityMode::Planar => "pts/m²",
            DensityMode::Volumetric => "pts/m³",
        }
    }
}

impl fmt::Display for DensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityMode::Planar => write!(f, "2D"),
            DensityMode::Volumetric => write!(f, "3D"),
        }
    }
}

impl FromStr for DensityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "2d" | "planar" => Ok(DensityMode::Planar),
            "3d" | "volumetric" => Ok(DensityMode::Volumetric),
            _ => Err(Error::invalid_parameter("mode", s, "expected 2D or 3D")),
        }
    }
}

/// Parameters for density estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityParams {
    /// Neighborhood radius in world units
    pub radius: f64,
    pub mode: DensityMode,
    /// Every `stride`-th point (in input order) is sampled
    pub stride: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            mode: DensityMode::Planar,
            stride: 100,
        }
    }
}

/// Result of a density estimation
#[derive(Debug, Clone, PartialEq)]
pub struct DensityEstimate {
    /// One density per sampled point, in sample order
    pub densities: Vec<f64>,
    /// `total_count / sample_count`. Multiply histogram bin counts by this
    /// to estimate the whole population; densities are not scaled.
    pub scaling_factor: f64,
    pub sample_count: usize,
    pub total_count: usize,
    pub mode: DensityMode,
    pub radius: f64,
}

impl DensityEstimate {
    /// Histogram of the densities with bin counts scaled up to the full
    /// point population.
    pub fn population_histogram(&self, bins: usize) -> Result<Histogram> {
        Ok(Histogram::from_values(&self.densities, bins)?.scaled(self.scaling_factor))
    }

    pub fn mean(&self) -> f64 {
        self.densities.iter().sum::<f64>() / self.densities.len() as f64
    }

    pub fn min(&self) -> f64 {
        self.densities.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.densities.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Point density estimation algorithm
#[derive(Debug, Clone, Default)]
pub struct PointDensity;

impl Algorithm for PointDensity {
    type Input = PointSet;
    type Output = DensityEstimate;
    type Params = DensityParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "PointDensity"
    }

    fn description(&self) -> &'static str {
        "Estimate local point density by counting neighbors within a radius of sampled points"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        estimate_density(&input, &params)
    }
}

/// Estimate local point density.
///
/// The neighbor index covers the full point set; only the query points are
/// subsampled (indices `0, stride, 2*stride, ...`), so each count reflects
/// the true local density. The subsample assumes density is roughly
/// constant over a stride-sized neighborhood.
///
/// - 2D: `density = count / (π r²)`
/// - 3D: `density = count / (4/3 π r³)`
///
/// Counts include the sampled point itself.
///
/// # Errors
/// - [`Error::EmptyInput`] if there are no points
/// - [`Error::InvalidParameter`] if `radius` is not a finite positive value
///   or `stride` is 0
pub fn estimate_density(points: &PointSet, params: &DensityParams) -> Result<DensityEstimate> {
    let radius = params.radius;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::invalid_parameter(
            "radius",
            radius,
            "must be a finite value greater than 0",
        ));
    }
    if params.stride == 0 {
        return Err(Error::invalid_parameter("stride", 0, "must be at least 1"));
    }
    if points.is_empty() {
        return Err(Error::EmptyInput {
            operation: "density estimation",
        });
    }

    let tree = KdTree::build(points.points(), params.mode.metric())?;
    let samples: Vec<&Point> = points.iter().step_by(params.stride).collect();
    debug!(
        total = points.len(),
        samples = samples.len(),
        mode = %params.mode,
        "estimating density, radius {}",
        radius
    );

    let measure = params.mode.neighborhood_measure(radius);
    let densities = samples
        .par_iter()
        .map(|p| {
            tree.count_within_radius(p, radius)
                .map(|count| count as f64 / measure)
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(DensityEstimate {
        scaling_factor: points.len() as f64 / samples.len() as f64,
        sample_count: samples.len(),
        total_count: points.len(),
        densities,
        mode: params.mode,
        radius,
    })
}
