//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

/// Errors raised while building an index or answering a query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The index holds zero points, so no query can be answered.
    #[error("spatial index is empty")]
    EmptyIndex,

    /// An index parameter is out of range.
    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),

    /// A query coordinate is not finite or lies outside the valid range.
    #[error("invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Latitude as supplied by the caller.
        latitude: f64,
        /// Longitude as supplied by the caller.
        longitude: f64,
    },

    /// A data file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A stream failed mid-read.
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),
}

/// Why an ingestion row was dropped. Never fatal: the loader logs it and moves on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedRecord {
    /// The row is shorter than the GeoNames layout requires.
    #[error("expected at least {expected} tab-separated fields, found {found}")]
    TooFewFields {
        /// Minimum field count.
        expected: usize,
        /// Fields actually present.
        found: usize,
    },

    /// Latitude field is non-numeric or outside [-90, 90].
    #[error("latitude is not a valid number: {0:?}")]
    InvalidLatitude(String),

    /// Longitude field is non-numeric or outside [-180, 180].
    #[error("longitude is not a valid number: {0:?}")]
    InvalidLongitude(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
