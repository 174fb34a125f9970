//! The `RouteWriter` trait implemented by all output backends.

use mr_plan::RouteSummary;

use crate::OutputResult;

/// Trait implemented by the CSV and GeoJSON writers.
pub trait RouteWriter {
    /// Write one planned route.
    fn write_route(&mut self, summary: &RouteSummary) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
