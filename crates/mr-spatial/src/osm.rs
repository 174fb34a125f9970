//! OSM PBF road-graph loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use mr_spatial::osm::load_graph_pbf;
//!
//! let graph = load_graph_pbf(Path::new("bengaluru.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Only car-drivable `highway=*` ways (see [`RoadClass::from_highway`]).
//! Each way contributes its class and parsed `maxspeed`; speeds are resolved
//! later by the annotation pass.  One-way handling:
//!
//! | Tags                                   | Edges added       |
//! |----------------------------------------|-------------------|
//! | `oneway=yes/true/1`, `junction=roundabout` | forward only  |
//! | `oneway=-1/reverse`                    | backward only     |
//! | `oneway=no`                            | both              |
//! | none, `highway=motorway(_link)`        | forward only      |
//! | none, other classes                    | both              |
//!
//! # Memory note
//!
//! All OSM node positions are buffered in a map for the first pass because
//! ways reference nodes by id.  The map is dropped before the R-tree is
//! built.

use std::collections::HashSet;
use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::FxHashMap;
use tracing::info;

use mr_core::{Coordinate, NodeId, RoadClass};

use crate::graph::{Direction, EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::weights::parse_maxspeed;
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a drivable road graph from an OSM PBF file.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on parse errors.
pub fn load_graph_pbf(path: &Path) -> Result<RoadGraph, SpatialError> {
    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: FxHashMap<i64, Coordinate> = FxHashMap::default();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), Coordinate::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), Coordinate::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                if let Some(class) = tag("highway").and_then(RoadClass::from_highway) {
                    road_ways.push(OsmWay {
                        refs:         w.refs().collect(),
                        class,
                        maxspeed_kmh: tag("maxspeed").and_then(parse_maxspeed),
                        direction:    direction(class, tag("oneway"), tag("junction")),
                    });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: identify road-referenced node IDs ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    // ── Phase 3: build graph ──────────────────────────────────────────────
    let mut builder = RoadGraphBuilder::with_capacity(road_node_ids.len(), road_node_ids.len() * 2);
    let mut osm_to_mr: FxHashMap<i64, NodeId> = FxHashMap::default();

    // Sorted so NodeIds do not depend on hash iteration order.
    let mut ordered: Vec<i64> = road_node_ids.into_iter().collect();
    ordered.sort_unstable();
    for osm_id in ordered {
        if let Some(&pos) = all_nodes.get(&osm_id) {
            osm_to_mr.insert(osm_id, builder.add_node_with_external_id(osm_id, pos));
        }
    }
    drop(all_nodes);

    for way in &road_ways {
        for window in way.refs.windows(2) {
            let (Some(&a), Some(&b)) = (osm_to_mr.get(&window[0]), osm_to_mr.get(&window[1])) else {
                continue;
            };
            let attrs = EdgeAttrs {
                length_m:     builder.node_pos(a).distance_m(builder.node_pos(b)),
                class:        Some(way.class),
                maxspeed_kmh: way.maxspeed_kmh,
            };
            builder.add_segment(a, b, attrs, way.direction);
        }
    }

    let graph = builder.build();
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ways = road_ways.len(),
        path = %path.display(),
        "loaded OSM road graph"
    );
    Ok(graph)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:         Vec<i64>,
    class:        RoadClass,
    maxspeed_kmh: Option<f64>,
    direction:    Direction,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn direction(class: RoadClass, oneway: Option<&str>, junction: Option<&str>) -> Direction {
    match oneway {
        Some("yes" | "true" | "1") => Direction::Forward,
        Some("-1" | "reverse") => Direction::Backward,
        Some("no" | "false" | "0") => Direction::Both,
        _ if junction == Some("roundabout") => Direction::Forward,
        _ if class.is_implicit_oneway() => Direction::Forward,
        _ => Direction::Both,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oneway_tags() {
        assert_eq!(direction(RoadClass::Primary, Some("yes"), None), Direction::Forward);
        assert_eq!(direction(RoadClass::Primary, Some("-1"), None), Direction::Backward);
        assert_eq!(direction(RoadClass::Primary, None, None), Direction::Both);
        assert_eq!(direction(RoadClass::Primary, None, Some("roundabout")), Direction::Forward);
        assert_eq!(direction(RoadClass::Motorway, None, None), Direction::Forward);
        assert_eq!(direction(RoadClass::Motorway, Some("no"), None), Direction::Both);
    }
}
