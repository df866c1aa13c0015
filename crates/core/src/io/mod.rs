//! Reading point samples from disk
//!
//! Only plain-text XYZ is handled here; LAS/LAZ decoding belongs to
//! dedicated readers whose arrays can be fed to
//! [`PointSet::from_arrays`](crate::PointSet::from_arrays).

mod xyz;

pub use xyz::{parse_xyz, read_xyz, read_xyz_from_str};
