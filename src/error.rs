use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForestError {
    /// A build was given a range whose start follows its end, or which runs past the input.
    #[error("Invalid range {start}..{end} over {len} items")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// Storage for a subtree could not be reserved.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// The merge layer only answers nearest-neighbor queries.
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(&'static str),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid coordinate: lon {lon}, lat {lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },
}

pub type Result<T> = std::result::Result<T, ForestError>;
