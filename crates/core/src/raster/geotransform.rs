//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Maps cell indices (col, row) to world coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// Rasters produced by alsgrid are north-up: no rotation and a negative
/// `pixel_height`, so row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X direction
    pub pixel_width: f64,
    /// Cell size in Y direction, negative for north-up grids
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a transform with no rotation
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// North-up transform for square cells anchored at the upper-left
    /// corner `(west, north)`.
    pub fn from_origin(west: f64, north: f64, cell_size: f64) -> Self {
        Self::new(west, north, cell_size, -cell_size)
    }

    /// Convert to GDAL-style array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Upper-left origin as `(x, y)`
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    /// World coordinates of a fractional cell position
    fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Upper-left corner of cell `(row, col)`
    pub fn cell_corner(&self, row: usize, col: usize) -> (f64, f64) {
        self.apply(col as f64, row as f64)
    }

    /// Center of cell `(row, col)`
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Cell size (square cells, no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10 && self.col_rotation.abs() < 1e-10 && self.pixel_height < 0.0
    }

    /// World bounds `(min_x, min_y, max_x, max_y)` of a `rows x cols` grid
    pub fn bounds(&self, rows: usize, cols: usize) -> (f64, f64, f64, f64) {
        let corners = [
            self.cell_corner(0, 0),
            self.cell_corner(0, cols),
            self.cell_corner(rows, 0),
            self.cell_corner(rows, cols),
        ];
        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_origin_is_north_up() {
        let gt = GeoTransform::from_origin(500.0, 1000.0, 2.0);
        assert!(gt.is_north_up());
        assert_eq!(gt.to_gdal(), [500.0, 2.0, 0.0, 1000.0, 0.0, -2.0]);
        assert!(!GeoTransform::new(500.0, 1000.0, 2.0, 2.0).is_north_up());
    }

    #[test]
    fn test_cell_center() {
        let gt = GeoTransform::from_origin(100.0, 200.0, 10.0);

        let (x, y) = gt.cell_center(10, 5);
        assert_relative_eq!(x, 155.0, epsilon = 1e-10);
        assert_relative_eq!(y, 95.0, epsilon = 1e-10);

        let (x, y) = gt.cell_corner(10, 5);
        assert_relative_eq!(x, 150.0, epsilon = 1e-10);
        assert_relative_eq!(y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::from_origin(0.0, 50.0, 0.5);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 40);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 20.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 50.0, epsilon = 1e-10);
    }
}
