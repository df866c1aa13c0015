//! Maximum-height rasterization of point clouds
//!
//! Bins points into a regular grid and keeps the highest return per cell,
//! giving a first-return / canopy-top surface. Maximum is commutative and
//! associative, so neither point order nor the way points are split across
//! threads changes the result.

use crate::maybe_rayon::*;
use alsgrid_core::{
    Algorithm, Error, Extent, GeoTransform, PointSet, Raster, Result, CRS, DEFAULT_NODATA,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for max-height rasterization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterizeParams {
    /// Cell edge length in world units
    pub cell_size: f64,
    /// Value written to cells without points
    pub nodata: f64,
    /// Grid extent; defaults to the bounding box of the points.
    /// Points outside an explicit extent are skipped.
    pub extent: Option<Extent>,
    /// Coordinate system attached to the output raster
    pub crs: Option<CRS>,
    /// Number of point partitions accumulated independently;
    /// defaults to the number of worker threads
    pub partitions: Option<usize>,
}

impl Default for RasterizeParams {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            nodata: DEFAULT_NODATA,
            extent: None,
            crs: None,
            partitions: None,
        }
    }
}

impl RasterizeParams {
    pub fn with_cell_size(cell_size: f64) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }
}

/// Max-height rasterization algorithm
#[derive(Debug, Clone, Default)]
pub struct GridMaximum;

impl Algorithm for GridMaximum {
    type Input = PointSet;
    type Output = Raster;
    type Params = RasterizeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GridMaximum"
    }

    fn description(&self) -> &'static str {
        "Rasterize a point cloud keeping the highest elevation per cell"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        rasterize_max(&input, &params)
    }
}

/// Grid layout derived from an extent and a cell size
#[derive(Debug, Clone, Copy)]
struct GridLayout {
    x_min: f64,
    y_min: f64,
    cell_size: f64,
    rows: usize,
    cols: usize,
}

impl GridLayout {
    fn new(extent: &Extent, cell_size: f64) -> Result<Self> {
        let (width, height) = (extent.width(), extent.height());
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidGeometry { width, height });
        }

        let cols = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;
        let max_cells = isize::MAX as usize / std::mem::size_of::<f64>();
        if cols.checked_mul(rows).map_or(true, |n| n > max_cells) {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        Ok(Self {
            x_min: extent.x_min,
            y_min: extent.y_min,
            cell_size,
            rows,
            cols,
        })
    }

    /// Flat index `row * cols + col` of the cell holding (x, y), with `row`
    /// counted from the southern edge. Coordinates on the east or north
    /// edge fall into the last column/row.
    #[inline]
    fn cell_index(&self, x: f64, y: f64) -> usize {
        let col = (((x - self.x_min) / self.cell_size).floor() as usize).min(self.cols - 1);
        let row = (((y - self.y_min) / self.cell_size).floor() as usize).min(self.rows - 1);
        row * self.cols + col
    }
}

/// Rasterize a point set, keeping the maximum z per cell.
///
/// For every point `col = floor((x - x_min) / cell_size)` and
/// `row = floor((y - y_min) / cell_size)`; the grid has
/// `cols = ceil(width / cell_size)` and `rows = ceil(height / cell_size)`.
/// Row `row` is stored at `rows - 1 - row` so the raster is north-up, and
/// the transform is anchored at `(x_min, y_max)`.
///
/// # Errors
/// - [`Error::EmptyInput`] if there are no points
/// - [`Error::InvalidParameter`] for a non-positive cell size, or when an
///   aggregated height equals the no-data sentinel
/// - [`Error::InvalidGeometry`] if the extent has zero width or height
pub fn rasterize_max(points: &PointSet, params: &RasterizeParams) -> Result<Raster> {
    let cell_size = params.cell_size;
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::invalid_parameter(
            "cell_size",
            cell_size,
            "must be a finite value greater than 0",
        ));
    }
    if points.is_empty() {
        return Err(Error::EmptyInput {
            operation: "rasterize",
        });
    }

    let extent = match params.extent {
        Some(extent) => extent,
        // Non-empty, so bounds exist
        None => points
            .bounds()
            .map(|b| b.extent())
            .ok_or(Error::EmptyInput {
                operation: "rasterize",
            })?,
    };
    let layout = GridLayout::new(&extent, cell_size)?;
    let clip = params.extent.is_some();

    let partitions = params.partitions.unwrap_or_else(worker_count).max(1);
    let chunk_size = points.len().div_ceil(partitions).max(1);
    debug!(
        rows = layout.rows,
        cols = layout.cols,
        partitions,
        "rasterizing {} points",
        points.len()
    );

    // Partial grids use NaN for "no point yet". Each partition is merged
    // into a neighbour as soon as both are done, so only a few grids are
    // alive at a time whatever the partition count.
    let (merged, skipped) = points
        .points()
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut grid = vec![f64::NAN; layout.rows * layout.cols];
            let mut skipped = 0usize;
            for p in chunk {
                if clip && !extent.contains(p.x, p.y) {
                    skipped += 1;
                    continue;
                }
                let cell = &mut grid[layout.cell_index(p.x, p.y)];
                *cell = max_cell(*cell, p.z);
            }
            (grid, skipped)
        })
        .reduce_with(|(mut acc, skipped_a), (grid, skipped_b)| {
            for (a, v) in acc.iter_mut().zip(grid) {
                *a = max_cell(*a, v);
            }
            (acc, skipped_a + skipped_b)
        })
        .unwrap_or_else(|| (vec![f64::NAN; layout.rows * layout.cols], 0));
    if skipped > 0 {
        debug!("skipped {} points outside the grid extent", skipped);
    }

    let nodata = params.nodata;
    if merged.iter().any(|&v| v == nodata) {
        return Err(Error::invalid_parameter(
            "nodata",
            nodata,
            "collides with an aggregated elevation",
        ));
    }

    // Flip south-up accumulation rows into north-up storage
    let (rows, cols) = (layout.rows, layout.cols);
    let mut data = Vec::with_capacity(rows * cols);
    for storage_row in 0..rows {
        let row = rows - 1 - storage_row;
        data.extend(
            merged[row * cols..(row + 1) * cols]
                .iter()
                .map(|&v| if v.is_nan() { nodata } else { v }),
        );
    }

    let transform = GeoTransform::from_origin(extent.x_min, extent.y_max, cell_size);
    Ok(Raster::from_vec(data, rows, cols, transform, nodata)?.with_crs(params.crs.clone()))
}

/// Per-cell maximum where NaN means "empty".
///
/// Uses the IEEE total order so `0.0` always wins over `-0.0`, keeping
/// the merge independent of order and partitioning down to the bit.
#[inline]
fn max_cell(acc: f64, z: f64) -> f64 {
    if acc.is_nan() {
        z
    } else if z.is_nan() || acc.total_cmp(&z).is_ge() {
        acc
    } else {
        z
    }
}
