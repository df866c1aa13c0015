//! Change detection between rasters of the same grid

mod difference;

pub use difference::{raster_difference, RasterDifference};
