//! Point-cloud aggregation
//!
//! Turn point sets into gridded or statistical products:
//! - Max-height rasterization: first-return / canopy-top surface
//! - Density: neighbors per unit area or volume around sampled points
//! - Histogram: population-scaled distribution of sampled densities

mod density;
mod histogram;
mod rasterize;

pub use density::{estimate_density, DensityEstimate, DensityMode, DensityParams, PointDensity};
pub use histogram::Histogram;
pub use rasterize::{rasterize_max, GridMaximum, RasterizeParams};
