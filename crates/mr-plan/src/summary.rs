//! Route summary: everything a renderer needs about one planned route.

use mr_core::{Coordinate, NodeId};
use mr_facility::RankedFacility;
use mr_spatial::{Path, PathMetrics, RoadGraph};

use crate::{PlanError, PlanResult};

/// Result of one planning request.
///
/// Distance and time are taken from [`PathMetrics`] computed over `path`;
/// `geometry` holds the coordinates of `path`'s nodes, in order, so the
/// summary can be rendered without the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSummary {
    /// Origin as supplied by the caller (not snapped).
    pub origin: Coordinate,
    /// Selected facility with its great-circle distance from the origin.
    pub facility: RankedFacility,
    pub origin_node: NodeId,
    pub destination_node: NodeId,
    pub path: Path,
    pub geometry: Vec<Coordinate>,
    /// Distance of each hop, summing to `distance_m`.
    pub hop_distances_m: Vec<f64>,
    pub distance_m: f64,
    pub travel_time_min: f64,
}

impl RouteSummary {
    /// Package a computed route.
    ///
    /// Fails if a path node is missing from `graph`, the metrics are
    /// negative or non-finite, or the per-hop distances do not match the
    /// path.
    pub fn build(
        origin:   Coordinate,
        facility: RankedFacility,
        graph:    &RoadGraph,
        path:     Path,
        metrics:  PathMetrics,
    ) -> PlanResult<Self> {
        for (what, v) in [("distance", metrics.distance_m), ("travel time", metrics.travel_time_min)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(PlanError::Summary(format!("{what} {v} is negative or not finite")));
            }
        }

        if metrics.hop_distances_m.len() != path.edges().len() {
            return Err(PlanError::Summary(format!(
                "{} hop distances for a path of {} hops",
                metrics.hop_distances_m.len(),
                path.edges().len()
            )));
        }
        if let Some(bad) = metrics.hop_distances_m.iter().find(|d| !(d.is_finite() && **d >= 0.0)) {
            return Err(PlanError::Summary(format!("hop distance {bad} is negative or not finite")));
        }

        let geometry = path
            .nodes()
            .iter()
            .map(|&n| graph.node_coordinate(n))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            origin,
            facility,
            origin_node: path.origin(),
            destination_node: path.destination(),
            path,
            geometry,
            hop_distances_m: metrics.hop_distances_m,
            distance_m: metrics.distance_m,
            travel_time_min: metrics.travel_time_min,
        })
    }

    pub fn facility_name(&self) -> &str {
        self.facility.facility.display_name()
    }

    /// The facility's centroid.
    pub fn destination(&self) -> Coordinate {
        self.facility.facility.coordinate
    }

    /// Number of road segments traversed.
    pub fn hop_count(&self) -> usize {
        self.path.edges().len()
    }
}
