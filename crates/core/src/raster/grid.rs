//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// No-data sentinel used when a caller does not choose one.
///
/// Deliberately not 0: a zero would be indistinguishable from a real
/// elevation at sea level or a real zero change.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// A georeferenced, north-up `f64` grid.
///
/// Row 0 is the northernmost row and column 0 the westernmost. Cells with
/// no measurement hold the `nodata` sentinel; NaN cells are treated as
/// no-data too.
///
/// A raster is built once and then only read: there is no API to change
/// cell values. Derived products (such as differences) are new rasters.
///
/// # Example
///
/// ```
/// use alsgrid_core::{GeoTransform, Raster, DEFAULT_NODATA};
///
/// let raster = Raster::from_vec(
///     vec![1.0, DEFAULT_NODATA, 3.0, 4.0],
///     2,
///     2,
///     GeoTransform::from_origin(0.0, 2.0, 1.0),
///     DEFAULT_NODATA,
/// )
/// .unwrap();
///
/// assert_eq!(raster.value(0, 0).unwrap(), Some(1.0));
/// assert_eq!(raster.value(0, 1).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    /// Cell values in row-major order (row, col)
    data: Array2<f64>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: f64,
}

impl Raster {
    /// Create a `rows x cols` raster where every cell is no-data
    pub fn nodata_filled(rows: usize, cols: usize, transform: GeoTransform, nodata: f64) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), nodata),
            transform,
            crs: None,
            nodata,
        }
    }

    /// Create a raster from row-major cell values
    pub fn from_vec(
        data: Vec<f64>,
        rows: usize,
        cols: usize,
        transform: GeoTransform,
        nodata: f64,
    ) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array, transform, nodata))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<f64>, transform: GeoTransform, nodata: f64) -> Self {
        Self {
            data,
            transform,
            crs: None,
            nodata,
        }
    }

    /// Attach a coordinate reference system
    pub fn with_crs(mut self, crs: Option<CRS>) -> Self {
        self.crs = crs;
        self
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Raw value at (row, col), no-data sentinel included
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Value at (row, col), `None` where the cell is no-data
    pub fn value(&self, row: usize, col: usize) -> Result<Option<f64>> {
        let v = self.get(row, col)?;
        Ok((!self.is_nodata(v)).then_some(v))
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        unsafe { *self.data.uget((row, col)) }
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Consume the raster and return the underlying array
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Get a row slice
    pub fn row(&self, row: usize) -> Result<ArrayView1<'_, f64>> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.data.row(row))
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    /// The no-data sentinel
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Upper-left corner `(x_min, y_max)`
    pub fn origin(&self) -> (f64, f64) {
        self.transform.origin()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.rows(), self.cols())
    }

    /// World coordinates of the center of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.cell_center(row, col)
    }

    // Value checks

    /// Whether `value` is the no-data sentinel (or NaN)
    pub fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || value == self.nodata
    }

    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    /// Fail with [`Error::ShapeMismatch`] unless `other` lies on the same
    /// grid.
    ///
    /// Checked in order: dimensions, cell size, orientation (axis
    /// directions and rotation), origin, and finally the CRS when both
    /// rasters carry one.
    pub fn ensure_same_grid(&self, other: &Raster) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                what: "dimensions",
                left: format!("{}x{}", self.rows(), self.cols()),
                right: format!("{}x{}", other.rows(), other.cols()),
            });
        }

        let (a, b) = (&self.transform, &other.transform);
        let size = |t: &GeoTransform| (t.pixel_width.abs(), t.pixel_height.abs());
        if size(a) != size(b) {
            return Err(Error::ShapeMismatch {
                what: "cell size",
                left: format!("{:?}", size(a)),
                right: format!("{:?}", size(b)),
            });
        }
        let orientation = |t: &GeoTransform| {
            (
                t.pixel_width.is_sign_negative(),
                t.pixel_height.is_sign_negative(),
                t.row_rotation,
                t.col_rotation,
            )
        };
        if orientation(a) != orientation(b) {
            let describe = |t: &GeoTransform| {
                if t.is_north_up() {
                    "north-up".to_string()
                } else {
                    format!("{:?}", t.to_gdal())
                }
            };
            return Err(Error::ShapeMismatch {
                what: "orientation",
                left: describe(a),
                right: describe(b),
            });
        }
        if self.origin() != other.origin() {
            return Err(Error::ShapeMismatch {
                what: "origin",
                left: format!("{:?}", self.origin()),
                right: format!("{:?}", other.origin()),
            });
        }
        if let (Some(left), Some(right)) = (&self.crs, &other.crs) {
            if !left.is_equivalent(right) {
                return Err(Error::ShapeMismatch {
                    what: "crs",
                    left: left.to_string(),
                    right: right.to_string(),
                });
            }
        }
        Ok(())
    }

    // Statistics

    /// Basic statistics over valid cells
    pub fn statistics(&self) -> RasterStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter().filter(|&&v| !self.is_nodata(v)) {
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
            sum += value;
            count += 1;
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(data: Vec<f64>, rows: usize, cols: usize) -> Raster {
        Raster::from_vec(
            data,
            rows,
            cols,
            GeoTransform::from_origin(0.0, rows as f64, 1.0),
            DEFAULT_NODATA,
        )
        .unwrap()
    }

    #[test]
    fn test_raster_creation() {
        let raster = Raster::nodata_filled(100, 200, GeoTransform::default(), DEFAULT_NODATA);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
        assert!(raster.is_nodata_at(50, 50).unwrap());
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Raster::from_vec(vec![0.0; 5], 2, 3, GeoTransform::default(), DEFAULT_NODATA);
        assert!(matches!(err, Err(Error::InvalidDimensions { width: 3, height: 2 })));
    }

    #[test]
    fn test_raster_access() {
        let raster = grid(vec![1.0, 2.0, 3.0, DEFAULT_NODATA, f64::NAN, 0.0], 2, 3);
        assert_eq!(raster.get(0, 2).unwrap(), 3.0);
        assert_eq!(raster.value(1, 0).unwrap(), None);
        assert_eq!(raster.value(1, 1).unwrap(), None);
        assert_eq!(raster.value(1, 2).unwrap(), Some(0.0));
        assert!(matches!(raster.get(2, 0), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_raster_statistics() {
        let raster = grid(vec![4.0, DEFAULT_NODATA, -2.0, 10.0], 2, 2);
        let stats = raster.statistics();
        assert_eq!(stats.min, Some(-2.0));
        assert_eq!(stats.max, Some(10.0));
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 1);
    }

    #[test]
    fn test_statistics_all_nodata() {
        let raster = Raster::nodata_filled(3, 3, GeoTransform::default(), DEFAULT_NODATA);
        let stats = raster.statistics();
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.nodata_count, 9);
    }

    #[test]
    fn test_same_grid_checks() {
        let a = grid(vec![0.0; 6], 2, 3);
        let b = grid(vec![1.0; 6], 2, 3);
        assert!(a.ensure_same_grid(&b).is_ok());

        let taller = grid(vec![0.0; 9], 3, 3);
        assert!(matches!(
            a.ensure_same_grid(&taller),
            Err(Error::ShapeMismatch { what: "dimensions", .. })
        ));

        let shifted = Raster::from_vec(
            vec![0.0; 6],
            2,
            3,
            GeoTransform::from_origin(1.0, 2.0, 1.0),
            DEFAULT_NODATA,
        )
        .unwrap();
        assert!(matches!(
            a.ensure_same_grid(&shifted),
            Err(Error::ShapeMismatch { what: "origin", .. })
        ));
    }

    #[test]
    fn test_same_grid_rejects_flipped_or_rotated() {
        let a = grid(vec![0.0; 4], 2, 2);

        // same origin and cell size, but rows run south to north
        let south_up = Raster::from_vec(
            vec![0.0; 4],
            2,
            2,
            GeoTransform::new(0.0, 2.0, 1.0, 1.0),
            DEFAULT_NODATA,
        )
        .unwrap();
        assert!(matches!(
            a.ensure_same_grid(&south_up),
            Err(Error::ShapeMismatch { what: "orientation", .. })
        ));

        let mut rotated_gt = GeoTransform::from_origin(0.0, 2.0, 1.0);
        rotated_gt.row_rotation = 0.1;
        let rotated = Raster::from_vec(vec![0.0; 4], 2, 2, rotated_gt, DEFAULT_NODATA).unwrap();
        assert!(matches!(
            a.ensure_same_grid(&rotated),
            Err(Error::ShapeMismatch { what: "orientation", .. })
        ));
    }

    #[test]
    fn test_same_grid_compares_crs_when_both_known() {
        let a = grid(vec![0.0; 4], 2, 2).with_crs(Some(CRS::puwg92()));
        let same = grid(vec![0.0; 4], 2, 2).with_crs(Some(CRS::from_epsg(2180)));
        let unknown = grid(vec![0.0; 4], 2, 2);
        let other = grid(vec![0.0; 4], 2, 2).with_crs(Some(CRS::from_epsg(32634)));

        assert!(a.ensure_same_grid(&same).is_ok());
        assert!(a.ensure_same_grid(&unknown).is_ok());
        assert!(matches!(
            a.ensure_same_grid(&other),
            Err(Error::ShapeMismatch { what: "crs", .. })
        ));
    }

    #[test]
    fn test_with_crs() {
        let raster = grid(vec![0.0; 4], 2, 2).with_crs(Some(CRS::puwg92()));
        assert_eq!(raster.crs().and_then(|c| c.epsg()), Some(2180));
    }
}
