//! Cell-wise raster difference
//!
//! Compares two rasters of the same grid, typically surfaces rasterized
//! from two epochs with the same class filter and cell size, to obtain an
//! elevation-change surface.

use crate::maybe_rayon::*;
use alsgrid_core::{Algorithm, Error, Raster, Result};

/// Raster differencing algorithm; input is `(a, b)`, output `a - b`
#[derive(Debug, Clone, Default)]
pub struct RasterDifference;

impl Algorithm for RasterDifference {
    type Input = (Raster, Raster);
    type Output = Raster;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "RasterDifference"
    }

    fn description(&self) -> &'static str {
        "Subtract one raster from another cell by cell, propagating no-data"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        raster_difference(&input.0, &input.1)
    }
}

/// Compute `a - b` for every cell.
///
/// A cell is no-data in the result when it is no-data in either operand
/// (each operand judged by its own sentinel). The result takes `a`'s
/// transform, CRS and no-data value; neither input is modified.
///
/// # Errors
/// - [`Error::ShapeMismatch`] unless both rasters lie on the same grid
///   (see [`Raster::ensure_same_grid`]). Nothing is computed in that case.
/// - [`Error::InvalidParameter`] when a valid difference equals `a`'s
///   no-data value, since it would read back as a missing cell.
pub fn raster_difference(a: &Raster, b: &Raster) -> Result<Raster> {
    a.ensure_same_grid(b)?;

    let (rows, cols) = a.shape();
    let nodata = a.nodata();

    let row_values: Vec<Vec<f64>> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let mut out = Vec::with_capacity(cols);
            for col in 0..cols {
                // SAFETY: both rasters are rows x cols
                let va = unsafe { a.get_unchecked(row, col) };
                let vb = unsafe { b.get_unchecked(row, col) };
                if a.is_nodata(va) || b.is_nodata(vb) {
                    out.push(nodata);
                    continue;
                }
                let diff = va - vb;
                if diff == nodata {
                    return Err(Error::invalid_parameter(
                        "nodata",
                        nodata,
                        format!("equals the difference at row {}, col {}", row, col),
                    ));
                }
                out.push(diff);
            }
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;

    let data = row_values.concat();
    Ok(Raster::from_vec(data, rows, cols, *a.transform(), nodata)?.with_crs(a.crs().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsgrid_core::{GeoTransform, CRS, DEFAULT_NODATA};

    fn make(values: &[f64], rows: usize, cols: usize) -> Raster {
        Raster::from_vec(
            values.to_vec(),
            rows,
            cols,
            GeoTransform::from_origin(0.0, rows as f64, 1.0),
            DEFAULT_NODATA,
        )
        .unwrap()
    }

    #[test]
    fn test_raster_difference() {
        let before = make(&[10.0, 12.0, 14.0, 16.0], 2, 2);
        let after = make(&[15.0, 12.0, 10.0, DEFAULT_NODATA], 2, 2);

        let diff = raster_difference(&after, &before).unwrap();
        assert_eq!(diff.get(0, 0).unwrap(), 5.0);
        assert_eq!(diff.get(0, 1).unwrap(), 0.0);
        assert_eq!(diff.get(1, 0).unwrap(), -4.0);
        assert_eq!(diff.value(1, 1).unwrap(), None);
        assert_eq!(diff.transform(), after.transform());
    }

    #[test]
    fn test_nodata_from_either_side() {
        let a = Raster::from_vec(
            vec![f64::NAN, 1.0, 2.0],
            1,
            3,
            GeoTransform::from_origin(0.0, 1.0, 1.0),
            -1.0,
        )
        .unwrap();
        let b = make(&[0.0, DEFAULT_NODATA, 1.0], 1, 3);

        let diff = raster_difference(&a, &b).unwrap();
        assert_eq!(diff.nodata(), -1.0);
        assert_eq!(diff.get(0, 0).unwrap(), -1.0);
        assert_eq!(diff.get(0, 1).unwrap(), -1.0);
        assert_eq!(diff.get(0, 2).unwrap(), 1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = make(&[0.0; 6], 2, 3);
        let b = make(&[0.0; 9], 3, 3);
        assert!(matches!(
            raster_difference(&a, &b),
            Err(Error::ShapeMismatch { what: "dimensions", .. })
        ));

        let coarse = Raster::from_vec(
            vec![0.0; 6],
            2,
            3,
            GeoTransform::from_origin(0.0, 2.0, 2.0),
            DEFAULT_NODATA,
        )
        .unwrap();
        assert!(matches!(
            raster_difference(&a, &coarse),
            Err(Error::ShapeMismatch { what: "cell size", .. })
        ));
    }

    #[test]
    fn test_algorithm_keeps_crs() {
        let a = make(&[3.0, 4.0], 1, 2).with_crs(Some(CRS::puwg92()));
        let b = make(&[1.0, 1.0], 1, 2);
        let diff = RasterDifference.execute_default((a, b)).unwrap();
        assert_eq!(diff.crs().and_then(|c| c.epsg()), Some(2180));
        assert_eq!(diff.get(0, 1).unwrap(), 3.0);
    }

    #[test]
    fn test_difference_equal_to_nodata_is_rejected() {
        let a = make(&[5.0, 1.0], 1, 2);
        let b = make(&[4.0, 10_000.0], 1, 2);
        let err = raster_difference(&a, &b).unwrap_err();
        match err {
            Error::InvalidParameter { name, reason, .. } => {
                assert_eq!(name, "nodata");
                assert!(reason.contains("row 0, col 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_different_crs_is_rejected() {
        let a = make(&[1.0], 1, 1).with_crs(Some(CRS::puwg92()));
        let b = make(&[1.0], 1, 1).with_crs(Some(CRS::from_epsg(32634)));
        assert!(matches!(
            raster_difference(&a, &b),
            Err(Error::ShapeMismatch { what: "crs", .. })
        ));
    }
}
