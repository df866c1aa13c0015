//! # alsgrid core
//!
//! Core types for turning airborne laser-scanning returns into gridded
//! products.
//!
//! This crate provides:
//! - `PointSet`: immutable, validated point samples with optional class codes
//! - `LasClass` / `ClassFilter`: ASPRS classification codes and class masks
//! - `Raster`: north-up `f64` grid with a mandatory no-data sentinel
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS`: Coordinate Reference System descriptor
//! - `io`: plain-text XYZ point reader

pub mod crs;
pub mod error;
pub mod io;
pub mod point;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use point::{Bounds, ClassFilter, Extent, LasClass, Point, PointSet};
pub use raster::{GeoTransform, Raster, DEFAULT_NODATA};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::point::{Bounds, ClassFilter, Extent, LasClass, Point, PointSet};
    pub use crate::raster::{GeoTransform, Raster, DEFAULT_NODATA};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in alsgrid.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
