//! The request-level planner.

use mr_core::Coordinate;
use mr_facility::{FacilityProvider, select_best};
use mr_spatial::{DijkstraEngine, RoadGraphProvider, RouteEngine, path_metrics};
use tracing::{debug, info, info_span};

use crate::{PlanResult, PlannerConfig, RouteSummary};

/// Graph radius used when neither the configuration nor the facility search
/// supplies one.
const DEFAULT_GRAPH_RADIUS_M: f64 = 5_000.0;

/// Plans routes from an origin to its nearest facility.
///
/// # Steps
///
/// ```text
/// validate origin
///   → select facility   (radius expansion over config.radii_m)
///   → fetch road graph  (graph_radius_m, else the facility's radius)
///   → annotate weights  (no-op on an already annotated shared graph)
///   → snap origin and facility to graph nodes
///   → shortest path + metrics
///   → RouteSummary
/// ```
///
/// The planner holds no per-request state; one instance can serve requests
/// from many threads.
pub struct Planner<G, F, E = DijkstraEngine> {
    graphs:     G,
    facilities: F,
    engine:     E,
    config:     PlannerConfig,
}

impl<G, F> Planner<G, F, DijkstraEngine>
where
    G: RoadGraphProvider,
    F: FacilityProvider,
{
    /// Create a planner with the default Dijkstra engine.
    pub fn new(graphs: G, facilities: F, config: PlannerConfig) -> PlanResult<Self> {
        Self::with_engine(graphs, facilities, DijkstraEngine, config)
    }
}

impl<G, F, E> Planner<G, F, E>
where
    G: RoadGraphProvider,
    F: FacilityProvider,
    E: RouteEngine,
{
    /// Create a planner with a custom route engine.  Validates `config`.
    pub fn with_engine(graphs: G, facilities: F, engine: E, config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { graphs, facilities, engine, config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route using the configured search radii.
    pub fn plan_route(&self, origin: Coordinate) -> PlanResult<RouteSummary> {
        self.plan_route_with_radii(origin, &self.config.radii_m)
    }

    /// Plan a route, trying `radii` (metres, in order) for the facility
    /// search instead of the configured ones.
    pub fn plan_route_with_radii(&self, origin: Coordinate, radii: &[f64]) -> PlanResult<RouteSummary> {
        let span = info_span!("plan_route", lat = origin.lat, lon = origin.lon);
        let _enter = span.enter();

        let origin = Coordinate::try_new(origin.lat, origin.lon)?;

        let facility = select_best(origin, radii, |radius_m| {
            self.facilities.fetch(origin, radius_m, &self.config.facility_tags)
        })?;

        let graph_radius_m = self
            .config
            .graph_radius_m
            .or(facility.radius_m)
            .unwrap_or(DEFAULT_GRAPH_RADIUS_M);
        let graph = self.graphs.fetch(origin, graph_radius_m)?;
        graph.annotate(&self.config.speed_policy())?;

        let origin_node = graph.nearest_node(origin)?;
        let destination_node = graph.nearest_node(facility.facility.coordinate)?;
        debug!(
            graph_radius_m,
            nodes = graph.node_count(),
            %origin_node,
            %destination_node,
            "snapped origin and facility"
        );

        let path = self.engine.shortest_path(&graph, origin_node, destination_node)?;
        let metrics = path_metrics(&graph, &path, self.config.distance_basis)?;
        let summary = RouteSummary::build(origin, facility, &graph, path, metrics)?;

        info!(
            facility = summary.facility_name(),
            facility_distance_m = summary.facility.distance_m,
            distance_m = summary.distance_m,
            travel_time_min = summary.travel_time_min,
            hops = summary.hop_count(),
            "planned route"
        );
        Ok(summary)
    }

    /// Plan one independent route per origin, preserving input order.
    ///
    /// With the `parallel` feature the requests run on Rayon's thread pool.
    pub fn plan_many(&self, origins: &[Coordinate]) -> Vec<PlanResult<RouteSummary>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            origins.par_iter().map(|&o| self.plan_route(o)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            origins.iter().map(|&o| self.plan_route(o)).collect()
        }
    }
}
