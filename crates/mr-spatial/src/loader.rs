//! CSV road-graph loader.
//!
//! # CSV format
//!
//! Two files.  `nodes.csv`, one row per node:
//!
//! ```csv
//! node_id,lat,lon
//! 101,12.9716,77.5946
//! 102,12.9720,77.5990
//! ```
//!
//! `edges.csv`, one row per road segment:
//!
//! ```csv
//! from,to,length_m,highway,maxspeed_kmh,oneway
//! 101,102,480.5,primary,60,no
//! 102,101,,residential,,yes
//! ```
//!
//! | Column         | Meaning                                                      |
//! |----------------|--------------------------------------------------------------|
//! | `from`, `to`   | `node_id` values from `nodes.csv`                            |
//! | `length_m`     | metres; empty → great-circle distance between the endpoints  |
//! | `highway`      | OSM class; empty → unknown; non-drivable values skip the row |
//! | `maxspeed_kmh` | posted speed; empty → resolved at annotation                 |
//! | `oneway`       | `yes`/`true`/`1` adds `from → to` only, `-1`/`reverse` adds  |
//! |                | `to → from` only, anything else adds both                    |
//!
//! Repeated `(from, to)` rows become parallel edges.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, info};

use mr_core::{Coordinate, NodeId, RoadClass};

use crate::graph::{Direction, EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: i64,
    lat:     f64,
    lon:     f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:         i64,
    to:           i64,
    length_m:     Option<f64>,
    highway:      Option<String>,
    maxspeed_kmh: Option<f64>,
    oneway:       Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road graph from `nodes.csv` and `edges.csv` files.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> SpatialResult<RoadGraph> {
    let graph = load_graph_reader(std::fs::File::open(nodes)?, std::fs::File::open(edges)?)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        path = %edges.display(),
        "loaded road graph"
    );
    Ok(graph)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();
    let mut by_external: FxHashMap<i64, NodeId> = FxHashMap::default();

    for row in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = row?;
        let pos = Coordinate::try_new(row.lat, row.lon)
            .map_err(|e| SpatialError::Parse(format!("node {}: {e}", row.node_id)))?;
        if by_external.contains_key(&row.node_id) {
            return Err(SpatialError::Parse(format!("duplicate node_id {}", row.node_id)));
        }
        let id = builder.add_node_with_external_id(row.node_id, pos);
        by_external.insert(row.node_id, id);
    }

    let mut skipped = 0usize;
    for row in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = row?;
        let lookup = |ext: i64| {
            by_external
                .get(&ext)
                .copied()
                .ok_or_else(|| SpatialError::Parse(format!("edge references unknown node_id {ext}")))
        };
        let from = lookup(row.from)?;
        let to = lookup(row.to)?;

        let class = match row.highway.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(h) => match RoadClass::from_highway(h) {
                Some(class) => Some(class),
                None => {
                    skipped += 1;
                    continue;
                }
            },
        };

        let length_m = row
            .length_m
            .unwrap_or_else(|| builder.node_pos(from).distance_m(builder.node_pos(to)));
        let attrs = EdgeAttrs { length_m, class, maxspeed_kmh: row.maxspeed_kmh };

        builder.add_segment(from, to, attrs, oneway_direction(row.oneway.as_deref()));
    }

    if skipped > 0 {
        debug!(skipped, "skipped non-drivable edge rows");
    }
    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn oneway_direction(raw: Option<&str>) -> Direction {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("yes" | "true" | "1") => Direction::Forward,
        Some("-1" | "reverse") => Direction::Backward,
        _ => Direction::Both,
    }
}
