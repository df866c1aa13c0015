//! # alsgrid algorithms
//!
//! Aggregation of airborne laser-scanning point clouds.
//!
//! ## Modules
//!
//! - **spatial**: k-d tree for fixed-radius neighbor queries
//! - **pointcloud**: max-height rasterization, density estimation, histograms
//! - **change**: cell-wise differencing of rasters

pub mod change;
mod maybe_rayon;
pub mod pointcloud;
pub mod spatial;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::change::{raster_difference, RasterDifference};
    pub use crate::pointcloud::{
        estimate_density, rasterize_max, DensityEstimate, DensityMode, DensityParams,
        GridMaximum, Histogram, PointDensity, RasterizeParams,
    };
    pub use crate::spatial::{KdTree, Metric, Neighbor};
    pub use alsgrid_core::prelude::*;
}
