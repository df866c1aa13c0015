//! Point samples and point sets

mod bounds;
mod classification;

pub use bounds::{Bounds, Extent};
pub use classification::{ClassFilter, LasClass};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single laser return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// ASPRS class code, if the source carried one
    pub classification: Option<u8>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            classification: None,
        }
    }

    pub fn classified(x: f64, y: f64, z: f64, code: u8) -> Self {
        Self {
            x,
            y,
            z,
            classification: Some(code),
        }
    }

    pub fn class(&self) -> Option<LasClass> {
        self.classification.map(LasClass::from_code)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// An ordered, immutable collection of points.
///
/// Every coordinate is finite. Filtering keeps the original order, so a
/// mask computed over the source arrays stays aligned with the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Validate and wrap a list of points
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::NonFinitePoint { index });
        }
        Ok(Self { points })
    }

    /// Build from parallel coordinate arrays, as a LAS reader delivers them
    pub fn from_arrays(x: &[f64], y: &[f64], z: &[f64], classification: Option<&[u8]>) -> Result<Self> {
        let n = x.len();
        let check = |name: &'static str, len: usize| {
            if len == n {
                Ok(())
            } else {
                Err(Error::LengthMismatch {
                    name,
                    expected: n,
                    actual: len,
                })
            }
        };
        check("y", y.len())?;
        check("z", z.len())?;
        if let Some(codes) = classification {
            check("classification", codes.len())?;
        }

        let points = (0..n)
            .map(|i| Point {
                x: x[i],
                y: y[i],
                z: z[i],
                classification: classification.map(|codes| codes[i]),
            })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Bounding box, `None` for an empty set
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            min_z: first.z,
            max_x: first.x,
            max_y: first.y,
            max_z: first.z,
        };
        Some(self.points.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            min_z: b.min_z.min(p.z),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
            max_z: b.max_z.max(p.z),
        }))
    }

    /// Points accepted by `filter`, in their original order
    pub fn filter(&self, filter: &ClassFilter) -> PointSet {
        if *filter == ClassFilter::All {
            return self.clone();
        }
        PointSet {
            points: self
                .points
                .iter()
                .filter(|p| filter.matches(p.classification))
                .copied()
                .collect(),
        }
    }

    /// Whether any point carries a class code
    pub fn has_classification(&self) -> bool {
        self.points.iter().any(|p| p.classification.is_some())
    }

    /// Like [`filter`](Self::filter), but a set in which no point carries
    /// a class code is returned whole. Plain XYZ input has no classes for a
    /// mask to select on.
    pub fn filter_classified(&self, filter: &ClassFilter) -> PointSet {
        if self.has_classification() {
            self.filter(filter)
        } else {
            self.clone()
        }
    }

    /// Number of points per class code (`None` for unclassified input)
    pub fn class_counts(&self) -> BTreeMap<Option<u8>, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.points {
            *counts.entry(p.classification).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
