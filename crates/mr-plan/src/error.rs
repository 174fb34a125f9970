//! Planner error type and its flat classification.

use std::fmt;

use mr_core::CoreError;
use mr_facility::FacilityError;
use mr_spatial::SpatialError;
use thiserror::Error;

/// Errors returned by [`Planner`](crate::Planner).
///
/// Sources from the lower crates are kept intact; use [`PlanError::kind`]
/// to branch on the category without matching nested enums.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid origin: {0}")]
    InvalidOrigin(#[from] CoreError),

    #[error("planner configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Facility(#[from] FacilityError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("invalid route summary: {0}")]
    Summary(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Category of a [`PlanError`], as seen by a presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad origin, radius, or configuration supplied by the caller.
    InvalidInput,
    /// The road graph around the origin has no nodes.
    EmptyGraph,
    /// No facility within any search radius.
    NoFacilityFound,
    /// The facility is not reachable by road from the origin.
    NoPath,
    /// An edge produced a negative or non-finite travel time.
    InvalidEdgeWeight,
    /// A graph or facility source failed (I/O, parse, upstream service).
    Provider,
    /// Broken internal invariant.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput      => "invalid_input",
            ErrorKind::EmptyGraph        => "empty_graph",
            ErrorKind::NoFacilityFound   => "no_facility_found",
            ErrorKind::NoPath            => "no_path",
            ErrorKind::InvalidEdgeWeight => "invalid_edge_weight",
            ErrorKind::Provider          => "provider",
            ErrorKind::Internal          => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::InvalidOrigin(_) | PlanError::Config(_) => ErrorKind::InvalidInput,
            PlanError::Summary(_) => ErrorKind::Internal,
            PlanError::Facility(e) => match e {
                FacilityError::NoFacilityFound { .. } => ErrorKind::NoFacilityFound,
                FacilityError::InvalidRadius(_) => ErrorKind::InvalidInput,
                _ => ErrorKind::Provider,
            },
            PlanError::Spatial(e) => match e {
                SpatialError::EmptyGraph => ErrorKind::EmptyGraph,
                SpatialError::NoPath { .. } => ErrorKind::NoPath,
                SpatialError::InvalidEdgeWeight { .. } => ErrorKind::InvalidEdgeWeight,
                SpatialError::NotAnnotated
                | SpatialError::NodeNotFound(_)
                | SpatialError::EdgeNotFound(_)
                | SpatialError::InvalidPath(_) => ErrorKind::Internal,
                _ => ErrorKind::Provider,
            },
        }
    }
}
