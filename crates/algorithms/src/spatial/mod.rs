//! Spatial indexing for neighbor queries over point sets

pub mod kdtree;

pub use kdtree::{KdTree, Metric, Neighbor};
