//! Error types for NetCDF grid access.

use grid_query::QueryError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF grid access.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Data present but not shaped or typed as a lat/lon grid
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Error reported by libnetcdf
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),
}

impl NetCdfError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

impl From<NetCdfError> for QueryError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::MissingData(what) => QueryError::MissingVariable(what),
            NetCdfError::InvalidFormat(msg) => QueryError::InvalidGrid(msg),
            other => QueryError::Read(other.to_string()),
        }
    }
}
