//! Spatial-subsystem error type.

use thiserror::Error;

use mr_core::{EdgeId, NodeId};

/// Errors produced by `mr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("road graph has no nodes")]
    EmptyGraph,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("invalid weight on {edge}: {reason}")]
    InvalidEdgeWeight { edge: EdgeId, reason: String },

    #[error("road graph has not been annotated with travel times")]
    NotAnnotated,

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found in graph")]
    EdgeNotFound(EdgeId),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("road graph provider failed: {0}")]
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

pub type SpatialResult<T> = Result<T, SpatialError>;
