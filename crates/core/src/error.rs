//! Error types for alsgrid

use thiserror::Error;

/// Main error type for alsgrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation}: no points to process")]
    EmptyInput { operation: &'static str },

    #[error("Degenerate bounding box: {width} x {height}")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("Raster {what} mismatch: {left} vs {right}")]
    ShapeMismatch {
        what: &'static str,
        left: String,
        right: String,
    },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Point arrays differ in length: {name} has {actual}, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for alsgrid operations
pub type Result<T> = std::result::Result<T, Error>;
