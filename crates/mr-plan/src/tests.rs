//! Unit tests for mr-plan.
//!
//! End-to-end tests run the planner over region providers built from small
//! synthetic graphs laid out along the equator.

#[cfg(test)]
mod helpers {
    use std::f64::consts::PI;

    use mr_core::{Coordinate, EARTH_RADIUS_M};
    use mr_facility::{Facility, RegionFacilityProvider};
    use mr_spatial::{EdgeAttrs, RegionGraphProvider, RoadGraph, RoadGraphBuilder};

    use crate::{Planner, PlannerConfig};

    pub const ORIGIN: Coordinate = Coordinate { lat: 0.0, lon: 0.0 };

    /// A point `m` metres east of [`ORIGIN`] on the equator.
    pub fn east(m: f64) -> Coordinate {
        Coordinate::new(0.0, m / (EARTH_RADIUS_M * PI / 180.0))
    }

    /// `n` nodes 1000 m apart starting at the origin, joined by two-way
    /// roads with no speed metadata.
    pub fn line(n: usize) -> RoadGraph {
        let mut b = RoadGraphBuilder::new();
        let nodes: Vec<_> = (0..n).map(|i| b.add_node(east(i as f64 * 1_000.0))).collect();
        for w in nodes.windows(2) {
            b.add_road(w[0], w[1], EdgeAttrs::new(1_000.0));
        }
        b.build()
    }

    pub fn clinic(name: &str, at: Coordinate) -> Facility {
        Facility::new(at).with_name(name).with_tag("amenity", "clinic")
    }

    pub fn planner(
        graph: RoadGraph,
        facilities: Vec<Facility>,
        config: PlannerConfig,
    ) -> Planner<RegionGraphProvider, RegionFacilityProvider> {
        Planner::new(
            RegionGraphProvider::new(graph),
            RegionFacilityProvider::new(facilities),
            config,
        )
        .expect("valid config")
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;

    use mr_facility::FacilityTags;
    use mr_spatial::DistanceBasis;

    use crate::{ErrorKind, PlannerConfig};

    #[test]
    fn defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.radii_m, vec![5_000.0, 10_000.0]);
        assert_eq!(c.graph_radius_m, None);
        assert_eq!(c.fallback_speed_kmh, 50.0);
        assert_eq!(c.distance_basis, DistanceBasis::GreatCircle);
        assert_eq!(c.facility_tags, FacilityTags::medical());
        assert!(c.validate().is_ok());
        assert_eq!(c.speed_policy().fallback_kmh, 50.0);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            PlannerConfig { radii_m: vec![], ..Default::default() },
            PlannerConfig { radii_m: vec![5_000.0, -1.0], ..Default::default() },
            PlannerConfig { graph_radius_m: Some(0.0), ..Default::default() },
            PlannerConfig { fallback_speed_kmh: 0.0, ..Default::default() },
            PlannerConfig { fallback_speed_kmh: f64::NAN, ..Default::default() },
        ];
        for c in bad {
            let err = c.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{err}");
        }
    }

    #[test]
    fn partial_json() {
        let c = PlannerConfig::from_json_str(
            r#"{ "radii_m": [1000, 2000, 4000], "distance_basis": "edge_length" }"#,
        )
        .unwrap();
        assert_eq!(c.radii_m, vec![1_000.0, 2_000.0, 4_000.0]);
        assert_eq!(c.distance_basis, DistanceBasis::EdgeLength);
        assert_eq!(c.fallback_speed_kmh, 50.0);
        assert!(c.impute_speeds);
    }

    #[test]
    fn tags_from_json() {
        let c = PlannerConfig::from_json_str(
            r#"{ "facility_tags": [ { "key": "amenity", "values": ["hospital"] }, { "key": "emergency" } ] }"#,
        )
        .unwrap();
        assert!(c.facility_tags.matches(&[("amenity", "hospital")]));
        assert!(c.facility_tags.matches(&[("emergency", "yes")]));
        assert!(!c.facility_tags.matches(&[("amenity", "clinic")]));
    }

    #[test]
    fn invalid_json_is_config_error() {
        assert!(PlannerConfig::from_json_str("{ radii_m: }").is_err());
        assert!(PlannerConfig::from_json_str(r#"{ "radii_m": [] }"#).is_err());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("planner.json");
        let original = PlannerConfig { graph_radius_m: Some(7_500.0), ..Default::default() };
        let json = serde_json::to_string_pretty(&original).unwrap();
        std::fs::File::create(&path).unwrap().write_all(json.as_bytes()).unwrap();

        assert_eq!(PlannerConfig::load_json(&path).unwrap(), original);
        assert!(PlannerConfig::load_json(&dir.path().join("missing.json")).is_err());
    }
}

// ── Error classification ──────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use mr_core::{CoreError, EdgeId, NodeId};
    use mr_facility::FacilityError;
    use mr_spatial::SpatialError;

    use crate::{ErrorKind, PlanError};

    #[test]
    fn kinds() {
        let cases: Vec<(PlanError, ErrorKind)> = vec![
            (CoreError::InvalidCoordinate { lat: 91.0, lon: 0.0 }.into(), ErrorKind::InvalidInput),
            (FacilityError::NoFacilityFound { radii: vec![5_000.0] }.into(), ErrorKind::NoFacilityFound),
            (FacilityError::InvalidRadius(-1.0).into(), ErrorKind::InvalidInput),
            (FacilityError::Provider("down".into()).into(), ErrorKind::Provider),
            (SpatialError::EmptyGraph.into(), ErrorKind::EmptyGraph),
            (SpatialError::NoPath { from: NodeId(0), to: NodeId(1) }.into(), ErrorKind::NoPath),
            (
                SpatialError::InvalidEdgeWeight { edge: EdgeId(3), reason: "negative".into() }.into(),
                ErrorKind::InvalidEdgeWeight,
            ),
            (SpatialError::Provider("down".into()).into(), ErrorKind::Provider),
            (SpatialError::NotAnnotated.into(), ErrorKind::Internal),
            (PlanError::Summary("bad".into()), ErrorKind::Internal),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::NoFacilityFound.to_string(), "no_facility_found");
        assert_eq!(ErrorKind::NoPath.as_str(), "no_path");
    }

    #[test]
    fn source_is_preserved() {
        let err: PlanError = SpatialError::EmptyGraph.into();
        assert!(matches!(err, PlanError::Spatial(SpatialError::EmptyGraph)));
        assert_eq!(err.to_string(), "road graph has no nodes");
    }
}

// ── Route summary ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary {
    use mr_core::NodeId;
    use mr_facility::{Facility, RankedFacility};
    use mr_spatial::{DijkstraEngine, DistanceBasis, Path, PathMetrics, RouteEngine, SpeedPolicy, path_metrics};

    use super::helpers::{ORIGIN, east, line};
    use crate::{ErrorKind, RouteSummary};

    fn ranked(at_m: f64) -> RankedFacility {
        RankedFacility {
            facility: Facility::new(east(at_m)),
            distance_m: at_m,
            index: 0,
            radius_m: Some(5_000.0),
        }
    }

    #[test]
    fn geometry_follows_path() {
        let graph = line(3);
        graph.annotate(&SpeedPolicy::default()).unwrap();
        let path = DijkstraEngine.shortest_path(&graph, NodeId(0), NodeId(2)).unwrap();
        let metrics = path_metrics(&graph, &path, DistanceBasis::GreatCircle).unwrap();

        let s = RouteSummary::build(ORIGIN, ranked(2_000.0), &graph, path, metrics).unwrap();
        assert_eq!(s.geometry, vec![east(0.0), east(1_000.0), east(2_000.0)]);
        assert_eq!(s.origin_node, NodeId(0));
        assert_eq!(s.destination_node, NodeId(2));
        assert_eq!(s.hop_count(), 2);
        assert_eq!(s.facility_name(), "Unknown Facility");
        assert_eq!(s.destination(), east(2_000.0));
        assert_eq!(s.hop_distances_m.len(), 2);
        assert_eq!(s.hop_distances_m.iter().fold(0.0, |acc, d| acc + d), s.distance_m);
    }

    #[test]
    fn hop_distances_must_match_path() {
        let graph = line(3);
        graph.annotate(&SpeedPolicy::default()).unwrap();
        let path = DijkstraEngine.shortest_path(&graph, NodeId(0), NodeId(2)).unwrap();
        let mut metrics = path_metrics(&graph, &path, DistanceBasis::EdgeLength).unwrap();
        metrics.hop_distances_m.pop();

        let err = RouteSummary::build(ORIGIN, ranked(2_000.0), &graph, path, metrics).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn rejects_negative_metrics() {
        let graph = line(2);
        let bad = PathMetrics { distance_m: -1.0, ..Default::default() };
        let err = RouteSummary::build(ORIGIN, ranked(0.0), &graph, Path::trivial(NodeId(0)), bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn rejects_foreign_path() {
        let graph = line(2);
        let err = RouteSummary::build(
            ORIGIN,
            ranked(0.0),
            &graph,
            Path::trivial(NodeId(9)),
            PathMetrics::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}

// ── End-to-end planning ───────────────────────────────────────────────────────

#[cfg(test)]
mod planning {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mr_core::{Coordinate, NodeId};
    use mr_facility::{Facility, FacilityError, FacilityProvider, FacilityResult, FacilityTags, RegionFacilityProvider};
    use mr_spatial::{
        DijkstraEngine, DistanceBasis, EdgeAttrs, GraphCache, Path, RegionGraphProvider, RoadGraph,
        RoadGraphBuilder, RouteEngine, SpatialResult,
    };

    use super::helpers::{ORIGIN, clinic, east, line, planner};
    use crate::{ErrorKind, Planner, PlannerConfig};

    #[test]
    fn line_route_at_fallback_speed() {
        let p = planner(line(3), vec![clinic("C", east(2_000.0))], PlannerConfig::default());
        let s = p.plan_route(ORIGIN).unwrap();

        assert_eq!(s.path.nodes(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert!((s.distance_m - 2_000.0).abs() < 0.01, "got {}", s.distance_m);
        assert!((s.travel_time_min - 2.4).abs() < 1e-9, "got {}", s.travel_time_min);
        assert_eq!(s.facility_name(), "C");
        assert_eq!(s.facility.radius_m, Some(5_000.0));
        assert_eq!(s.origin, ORIGIN);
    }

    #[test]
    fn nearer_facility_is_chosen() {
        let p = planner(
            line(2),
            vec![clinic("900 m", east(900.0)), clinic("300 m", east(300.0))],
            PlannerConfig::default(),
        );
        let s = p.plan_route(ORIGIN).unwrap();
        assert_eq!(s.facility_name(), "300 m");
        assert!((s.facility.distance_m - 300.0).abs() < 1e-6);
        // 300 m snaps back to the origin node.
        assert!(s.path.is_trivial());
    }

    #[test]
    fn expands_to_second_radius() {
        let p = planner(line(9), vec![clinic("far", east(8_000.0))], PlannerConfig::default());
        let s = p.plan_route(ORIGIN).unwrap();
        assert_eq!(s.facility.radius_m, Some(10_000.0));
        assert_eq!(s.hop_count(), 8);
        assert!((s.distance_m - 8_000.0).abs() < 0.05);
        assert!((s.travel_time_min - 9.6).abs() < 1e-9);
    }

    #[test]
    fn explicit_radii_override_config() {
        let p = planner(line(9), vec![clinic("far", east(8_000.0))], PlannerConfig::default());
        let err = p.plan_route_with_radii(ORIGIN, &[1_000.0, 2_000.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFacilityFound);

        let s = p.plan_route_with_radii(ORIGIN, &[9_000.0]).unwrap();
        assert_eq!(s.facility.radius_m, Some(9_000.0));
    }

    #[test]
    fn no_facility_found() {
        let p = planner(line(3), vec![clinic("away", Coordinate::new(40.0, 40.0))], PlannerConfig::default());
        let err = p.plan_route(ORIGIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFacilityFound);
    }

    #[test]
    fn non_medical_is_ignored() {
        let shop = Facility::new(east(500.0)).with_name("bakery").with_tag("shop", "bakery");
        let p = planner(line(3), vec![shop], PlannerConfig::default());
        assert_eq!(p.plan_route(ORIGIN).unwrap_err().kind(), ErrorKind::NoFacilityFound);
    }

    #[test]
    fn disconnected_destination() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(east(0.0));
        let c = b.add_node(east(1_000.0));
        let island = b.add_node(east(3_000.0));
        let island_b = b.add_node(east(4_000.0));
        b.add_road(a, c, EdgeAttrs::new(1_000.0));
        b.add_road(island, island_b, EdgeAttrs::new(1_000.0));

        let p = planner(b.build(), vec![clinic("island", east(4_000.0))], PlannerConfig::default());
        assert_eq!(p.plan_route(ORIGIN).unwrap_err().kind(), ErrorKind::NoPath);
    }

    #[test]
    fn empty_graph_around_origin() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(Coordinate::new(45.0, 45.0));
        let p = planner(b.build(), vec![clinic("C", east(1_000.0))], PlannerConfig::default());
        assert_eq!(p.plan_route(ORIGIN).unwrap_err().kind(), ErrorKind::EmptyGraph);
    }

    #[test]
    fn invalid_edge_weight_aborts() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(east(0.0));
        let c = b.add_node(east(1_000.0));
        b.add_road(a, c, EdgeAttrs::new(-1_000.0));
        let p = planner(b.build(), vec![clinic("C", east(1_000.0))], PlannerConfig::default());
        assert_eq!(p.plan_route(ORIGIN).unwrap_err().kind(), ErrorKind::InvalidEdgeWeight);
    }

    #[test]
    fn invalid_origin() {
        let p = planner(line(3), vec![clinic("C", east(2_000.0))], PlannerConfig::default());
        for bad in [Coordinate::new(91.0, 0.0), Coordinate::new(0.0, 181.0), Coordinate::new(f64::NAN, 0.0)] {
            assert_eq!(p.plan_route(bad).unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn origin_at_facility() {
        let p = planner(line(3), vec![clinic("here", ORIGIN)], PlannerConfig::default());
        let s = p.plan_route(ORIGIN).unwrap();
        assert!(s.path.is_trivial());
        assert_eq!(s.distance_m, 0.0);
        assert_eq!(s.travel_time_min, 0.0);
        assert_eq!(s.geometry, vec![ORIGIN]);
    }

    #[test]
    fn graph_radius_override() {
        // Graph limited to 1500 m: the facility at 2000 m snaps to node 1.
        let config = PlannerConfig { graph_radius_m: Some(1_500.0), ..Default::default() };
        let p = planner(line(3), vec![clinic("C", east(2_000.0))], config);
        let s = p.plan_route(ORIGIN).unwrap();
        assert_eq!(s.path.nodes(), &[NodeId(0), NodeId(1)]);
        assert!((s.travel_time_min - 1.2).abs() < 1e-9);
    }

    #[test]
    fn edge_length_basis_and_fallback_speed() {
        let config = PlannerConfig {
            fallback_speed_kmh: 30.0,
            distance_basis: DistanceBasis::EdgeLength,
            ..Default::default()
        };
        let p = planner(line(3), vec![clinic("C", east(2_000.0))], config);
        let s = p.plan_route(ORIGIN).unwrap();
        assert_eq!(s.distance_m, 2_000.0);
        assert!((s.travel_time_min - 4.0).abs() < 1e-9);
    }

    #[test]
    fn cached_graph_is_reused() {
        let cache = Arc::new(GraphCache::new(RegionGraphProvider::new(line(3)), 0.01));
        let p = Planner::new(
            Arc::clone(&cache),
            RegionFacilityProvider::new(vec![clinic("C", east(2_000.0))]),
            PlannerConfig::default(),
        )
        .unwrap();

        let first = p.plan_route(ORIGIN).unwrap();
        let second = p.plan_route(ORIGIN).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    struct FailingFacilities;

    impl FacilityProvider for FailingFacilities {
        fn fetch(&self, _: Coordinate, _: f64, _: &FacilityTags) -> FacilityResult<Vec<Facility>> {
            Err(FacilityError::Provider("service unavailable".into()))
        }
    }

    #[test]
    fn provider_failure() {
        let p = Planner::new(RegionGraphProvider::new(line(3)), FailingFacilities, PlannerConfig::default())
            .unwrap();
        assert_eq!(p.plan_route(ORIGIN).unwrap_err().kind(), ErrorKind::Provider);
    }

    struct CountingEngine {
        calls: Arc<AtomicUsize>,
    }

    impl RouteEngine for CountingEngine {
        fn shortest_path(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Path> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            DijkstraEngine.shortest_path(graph, from, to)
        }
    }

    #[test]
    fn custom_engine() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Planner::with_engine(
            RegionGraphProvider::new(line(3)),
            RegionFacilityProvider::new(vec![clinic("C", east(2_000.0))]),
            CountingEngine { calls: Arc::clone(&calls) },
            PlannerConfig::default(),
        )
        .unwrap();
        p.plan_route(ORIGIN).unwrap();
        p.plan_route(ORIGIN).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = PlannerConfig { radii_m: Vec::new(), ..Default::default() };
        let result = Planner::new(
            RegionGraphProvider::new(line(2)),
            RegionFacilityProvider::default(),
            config,
        );
        assert!(matches!(result, Err(ref e) if e.kind() == ErrorKind::InvalidInput));
    }

    #[test]
    fn plan_many_keeps_order() {
        let p = planner(line(3), vec![clinic("C", east(2_000.0))], PlannerConfig::default());
        let results = p.plan_many(&[ORIGIN, Coordinate::new(100.0, 0.0), east(1_000.0)]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().hop_count(), 2);
        assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(results[2].as_ref().unwrap().hop_count(), 1);
    }
}
