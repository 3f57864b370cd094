//! Error types for grid queries.

use std::fmt;

use thiserror::Error;

/// Grid axis named in range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Errors that can occur while querying a grid.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query coordinate lies outside the grid's covered area.
    #[error("{axis} {value} is outside {axis} range {min} - {max}")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A required or requested variable is not present in the grid.
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// The grid itself is unusable (empty axis, shape mismatch).
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// The underlying grid resource could not be read.
    #[error("failed to read grid data: {0}")]
    Read(String),

    /// A field format option could not be applied.
    #[error("invalid format '{pattern}' for field {field}")]
    InvalidFormat { field: String, pattern: String },
}

impl QueryError {
    /// Create an OutOfRange error.
    pub fn out_of_range(axis: Axis, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            axis,
            value,
            min,
            max,
        }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create a Read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// The axis an OutOfRange error refers to.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Self::OutOfRange { axis, .. } => Some(*axis),
            _ => None,
        }
    }
}

/// Result type for grid query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
