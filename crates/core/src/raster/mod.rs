//! Raster data structures and georeferencing

mod geotransform;
mod grid;

pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics, DEFAULT_NODATA};
