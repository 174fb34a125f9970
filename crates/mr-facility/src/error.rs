//! Facility-subsystem error type.

use thiserror::Error;

/// Errors produced by `mr-facility`.
#[derive(Debug, Error)]
pub enum FacilityError {
    /// Every search radius produced an empty candidate set.
    #[error("no facility found within any search radius {radii:?} m")]
    NoFacilityFound { radii: Vec<f64> },

    #[error("invalid search radius {0} m: must be finite and positive")]
    InvalidRadius(f64),

    #[error("facility provider failed: {0}")]
    Provider(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type FacilityResult<T> = Result<T, FacilityError>;
