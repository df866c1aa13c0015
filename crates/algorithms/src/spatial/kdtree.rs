//! k-d tree over point-cloud samples
//!
//! Provides O(log n + k) fixed-radius neighbor queries over a point set,
//! either in the horizontal plane (z ignored) or in full 3D.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use alsgrid_core::{Error, Point, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Distance used for neighbor queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    /// Horizontal distance over (x, y); elevation is ignored
    #[default]
    Planar,
    /// Full 3D Euclidean distance
    Euclidean,
}

impl Metric {
    /// Number of coordinates the tree splits on
    pub fn dims(self) -> usize {
        match self {
            Metric::Planar => 2,
            Metric::Euclidean => 3,
        }
    }

    #[inline]
    fn dist_sq(self, a: &Point, b: &Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        match self {
            Metric::Planar => dx * dx + dy * dy,
            Metric::Euclidean => {
                let dz = a.z - b.z;
                dx * dx + dy * dy + dz * dz
            }
        }
    }
}

#[inline]
fn coord(p: &Point, dim: u8) -> f64 {
    match dim {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

/// A k-d tree borrowing the points it indexes.
///
/// The tree is read-only once built, so one instance can serve queries
/// from many threads at once.
#[derive(Debug)]
pub struct KdTree<'a> {
    points: &'a [Point],
    nodes: Vec<KdNode>,
    metric: Metric,
}

#[derive(Debug)]
struct KdNode {
    /// Index into `points`
    point_idx: usize,
    /// Split coordinate: 0 = x, 1 = y, 2 = z
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// A point found by a radius query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub point: Point,
    /// Index of the point in the indexed slice
    pub index: usize,
    pub distance_sq: f64,
}

impl<'a> KdTree<'a> {
    /// Build a k-d tree over `points`.
    ///
    /// Construction is O(n log n): each level partitions around the median
    /// of the split coordinate with a linear-time selection.
    pub fn build(points: &'a [Point], metric: Metric) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput {
                operation: "spatial index",
            });
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        build_recursive(points, &mut indices, 0, metric.dims(), &mut nodes);

        Ok(Self {
            points,
            nodes,
            metric,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// All points within `radius` of `query` (distance ≤ radius).
    ///
    /// The query point itself is included when it belongs to the indexed
    /// set. Results come in no particular order.
    pub fn within_radius(&self, query: &Point, radius: f64) -> Result<Vec<Neighbor>> {
        let radius_sq = checked_radius_sq(radius)?;
        let mut results = Vec::new();
        self.radius_recursive(0, query, radius_sq, &mut |idx, dist_sq| {
            results.push(Neighbor {
                point: self.points[idx],
                index: idx,
                distance_sq: dist_sq,
            })
        });
        Ok(results)
    }

    /// Number of points within `radius` of `query`, without collecting them
    pub fn count_within_radius(&self, query: &Point, radius: f64) -> Result<usize> {
        let radius_sq = checked_radius_sq(radius)?;
        let mut count = 0;
        self.radius_recursive(0, query, radius_sq, &mut |_, _| count += 1);
        Ok(count)
    }

    fn radius_recursive<F>(&self, node_idx: usize, query: &Point, radius_sq: f64, visit: &mut F)
    where
        F: FnMut(usize, f64),
    {
        let node = &self.nodes[node_idx];
        let p = &self.points[node.point_idx];

        let dist_sq = self.metric.dist_sq(query, p);
        if dist_sq <= radius_sq {
            visit(node.point_idx, dist_sq);
        }

        let diff = coord(query, node.split_dim) - coord(p, node.split_dim);

        // Descend into a side if the query lies there or the splitting
        // plane is within reach.
        if let Some(left) = node.left {
            if diff <= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(left, query, radius_sq, visit);
            }
        }
        if let Some(right) = node.right {
            if diff >= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(right, query, radius_sq, visit);
            }
        }
    }
}

fn checked_radius_sq(radius: f64) -> Result<f64> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::invalid_parameter(
            "radius",
            radius,
            "must be a finite value greater than 0",
        ));
    }
    Ok(radius * radius)
}

/// Recursively build the tree over `indices`, returning the new node's index.
///
/// Left subtrees hold points with split coordinate ≤ the node's, right
/// subtrees ≥ the node's.
fn build_recursive(
    points: &[Point],
    indices: &mut [usize],
    depth: usize,
    dims: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let split_dim = (depth % dims) as u8;
    let median = indices.len() / 2;

    indices.select_nth_unstable_by(median, |&a, &b| {
        coord(&points[a], split_dim)
            .partial_cmp(&coord(&points[b], split_dim))
            .unwrap_or(Ordering::Equal)
    });

    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx: indices[median],
        split_dim,
        left: None,
        right: None,
    });

    let (left, rest) = indices.split_at_mut(median);
    let right = &mut rest[1..];

    if !left.is_empty() {
        let child = build_recursive(points, left, depth + 1, dims, nodes);
        nodes[node_idx].left = Some(child);
    }
    if !right.is_empty() {
        let child = build_recursive(points, right, depth + 1, dims, nodes);
        nodes[node_idx].right = Some(child);
    }

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new(2.0, 3.0, 10.0),
            Point::new(5.0, 4.0, 20.0),
            Point::new(9.0, 6.0, 30.0),
            Point::new(4.0, 7.0, 40.0),
            Point::new(8.0, 1.0, 50.0),
            Point::new(7.0, 2.0, 60.0),
            Point::new(1.0, 8.0, 70.0),
            Point::new(6.0, 5.0, 80.0),
        ]
    }

    fn scattered(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let x = ((i * 7 + 13) % 100) as f64 * 0.37;
                let y = ((i * 11 + 37) % 100) as f64 * 0.41;
                let z = ((i * 17 + 5) % 50) as f64 * 0.2;
                Point::new(x, y, z)
            })
            .collect()
    }

    fn brute_force(points: &[Point], q: &Point, radius: f64, metric: Metric) -> usize {
        points
            .iter()
            .filter(|p| metric.dist_sq(q, p) <= radius * radius)
            .count()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            KdTree::build(&[], Metric::Planar),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_build_and_size() {
        let pts = sample_points();
        let tree = KdTree::build(&pts, Metric::Euclidean).unwrap();
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.nodes.len(), 8);
    }

    #[test]
    fn test_query_includes_member_point() {
        let pts = sample_points();
        let tree = KdTree::build(&pts, Metric::Planar).unwrap();
        let found = tree.within_radius(&pts[3], 1e-9).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 3);
        assert_eq!(found[0].distance_sq, 0.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(3.0, 4.0, 0.0)];
        let tree = KdTree::build(&pts, Metric::Planar).unwrap();
        assert_eq!(tree.count_within_radius(&pts[0], 5.0).unwrap(), 2);
        assert_eq!(tree.count_within_radius(&pts[0], 4.999).unwrap(), 1);
    }

    #[test]
    fn test_planar_ignores_elevation() {
        let pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(0.5, 0.0, 100.0)];
        let planar = KdTree::build(&pts, Metric::Planar).unwrap();
        let full = KdTree::build(&pts, Metric::Euclidean).unwrap();
        assert_eq!(planar.count_within_radius(&pts[0], 1.0).unwrap(), 2);
        assert_eq!(full.count_within_radius(&pts[0], 1.0).unwrap(), 1);
    }

    #[test]
    fn test_matches_brute_force() {
        let pts = scattered(1000);
        for metric in [Metric::Planar, Metric::Euclidean] {
            let tree = KdTree::build(&pts, metric).unwrap();
            for q in pts.iter().step_by(37) {
                for radius in [0.5, 2.0, 7.5] {
                    let found = tree.within_radius(q, radius).unwrap();
                    assert_eq!(found.len(), brute_force(&pts, q, radius, metric));
                    assert!(found.iter().all(|n| n.distance_sq <= radius * radius));
                    assert_eq!(tree.count_within_radius(q, radius).unwrap(), found.len());
                }
            }
        }
    }

    #[test]
    fn test_duplicate_points() {
        let pts = vec![Point::new(1.0, 1.0, 1.0); 10];
        let tree = KdTree::build(&pts, Metric::Euclidean).unwrap();
        assert_eq!(tree.count_within_radius(&pts[0], 0.1).unwrap(), 10);
    }

    #[test]
    fn test_collinear_points() {
        let pts: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
        let tree = KdTree::build(&pts, Metric::Planar).unwrap();
        let q = Point::new(4.5, 0.0, 0.0);
        assert_eq!(tree.count_within_radius(&q, 1.0).unwrap(), 2);
    }

    #[test]
    fn test_rejects_bad_radius() {
        let pts = sample_points();
        let tree = KdTree::build(&pts, Metric::Planar).unwrap();
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                tree.within_radius(&pts[0], radius),
                Err(Error::InvalidParameter { name: "radius", .. })
            ));
        }
    }
}
