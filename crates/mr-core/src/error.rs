//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they accept raw coordinates from callers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `mr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
