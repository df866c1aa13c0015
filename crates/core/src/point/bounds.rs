//! Bounding boxes of point sets

use serde::{Deserialize, Serialize};

/// Axis-aligned 3D bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Planar footprint area
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn volume(&self) -> f64 {
        self.area() * self.depth()
    }

    /// Planar footprint
    pub fn extent(&self) -> Extent {
        Extent {
            x_min: self.min_x,
            y_min: self.min_y,
            x_max: self.max_x,
            y_max: self.max_y,
        }
    }
}

/// Planar rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Smallest extent covering both
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Closed-interval containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_contains() {
        let a = Extent::new(0.0, 0.0, 10.0, 5.0);
        let b = Extent::new(-2.0, 3.0, 4.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u, Extent::new(-2.0, 0.0, 10.0, 8.0));
        assert!(u.contains(10.0, 8.0));
        assert!(!a.contains(10.1, 1.0));
    }

    #[test]
    fn test_bounds_measures() {
        let b = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            min_z: 100.0,
            max_x: 4.0,
            max_y: 2.0,
            max_z: 103.0,
        };
        assert_eq!(b.area(), 8.0);
        assert_eq!(b.volume(), 24.0);
        assert_eq!(b.extent().height(), 2.0);
    }
}
