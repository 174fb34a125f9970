//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`.  Edges
//! keep their insertion order within a source node, so parallel edges between
//! the same pair always appear in a stable order.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every node as a point on the unit sphere.
//! Chord length is monotonic in great-circle distance, so the R-tree nearest
//! neighbour is the exact great-circle nearest node.
//!
//! # Travel times
//!
//! Edge travel times are not stored by the builder.  They are derived once by
//! [`RoadGraph::annotate`] and then frozen; see [`crate::weights`].

use std::sync::OnceLock;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use mr_core::{Coordinate, EARTH_RADIUS_M, EdgeId, NodeId, RoadClass};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length between two unit-sphere points.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Physical attributes of one directed edge, as supplied by a loader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    /// Length in metres.  Validated (finite, ≥ 0) during annotation.
    pub length_m: f64,
    /// Road class, if known.  Used for speed imputation.
    pub class: Option<RoadClass>,
    /// Posted speed in km/h, if known.
    pub maxspeed_kmh: Option<f64>,
}

impl EdgeAttrs {
    pub fn new(length_m: f64) -> Self {
        Self { length_m, class: None, maxspeed_kmh: None }
    }

    pub fn with_class(mut self, class: RoadClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_maxspeed(mut self, kmh: f64) -> Self {
        self.maxspeed_kmh = Some(kmh);
        self
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for node
/// snapping.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    /// Identifier of each node in the source dataset (OSM id, CSV id).
    pub node_external_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Needed for path reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    /// Road class of each edge, if known.
    pub edge_class: Vec<Option<RoadClass>>,

    /// Posted speed of each edge in km/h, if known.
    pub edge_maxspeed_kmh: Vec<Option<f64>>,

    // ── Derived ───────────────────────────────────────────────────────────
    /// Travel time of each edge in seconds.  Written once by `annotate`.
    pub(crate) edge_travel_s: OnceLock<Vec<f64>>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Position of `node`, or [`SpatialError::NodeNotFound`].
    pub fn node_coordinate(&self, node: NodeId) -> SpatialResult<Coordinate> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// Contiguous index range; does not allocate.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// All edges from `from` to `to`, in `EdgeId` order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from)
            .filter(move |e| self.edge_to[e.index()] == to)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the node nearest to `pos` by great-circle distance.
    ///
    /// Nodes sharing the minimal distance are resolved to the lowest
    /// `NodeId`.  Fails with [`SpatialError::EmptyGraph`] if the graph has
    /// no nodes.
    pub fn nearest_node(&self, pos: Coordinate) -> SpatialResult<NodeId> {
        let query = pos.to_unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_d2) = candidates.next().ok_or(SpatialError::EmptyGraph)?;
        let mut best = first.id;
        for (entry, d2) in candidates {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Ok(best)
    }

    /// Extract the subgraph induced by all nodes within `radius_m` of
    /// `center`.
    ///
    /// Node and edge order is preserved; ids are renumbered densely.  The
    /// result carries the same length and speed metadata but is not
    /// annotated.
    pub fn subgraph_within(&self, center: Coordinate, radius_m: f64) -> RoadGraph {
        let mut remap = vec![NodeId::INVALID; self.node_count()];
        let mut b = RoadGraphBuilder::new();

        let half_deg = bbox_half_deg(center, radius_m);
        for (i, &pos) in self.node_pos.iter().enumerate() {
            if half_deg.is_some_and(|h| !pos.within_bbox(center, h)) {
                continue;
            }
            if center.distance_m(pos) <= radius_m {
                remap[i] = b.add_node_with_external_id(self.node_external_id[i], pos);
            }
        }

        for e in 0..self.edge_count() {
            let from = remap[self.edge_from[e].index()];
            let to   = remap[self.edge_to[e].index()];
            if from == NodeId::INVALID || to == NodeId::INVALID {
                continue;
            }
            b.add_directed_edge(from, to, EdgeAttrs {
                length_m:     self.edge_length_m[e],
                class:        self.edge_class[e],
                maxspeed_kmh: self.edge_maxspeed_kmh[e],
            });
        }

        b.build()
    }
}

/// Half-width in degrees of a box around `center` that contains every point
/// within `radius_m`, or `None` where a lat/lon box cannot bound the circle
/// (near the poles or across the antimeridian).
fn bbox_half_deg(center: Coordinate, radius_m: f64) -> Option<f64> {
    let angle = radius_m / EARTH_RADIUS_M;
    let lat_deg = angle.to_degrees();
    let cos_lat = (center.lat.abs() + lat_deg).min(90.0).to_radians().cos();
    // Haversine: sin(dlon / 2) <= sin(angle / 2) / cos(max |lat|).
    let ratio = (angle * 0.5).sin() / cos_lat;
    if ratio.is_nan() || ratio >= 1.0 || angle >= std::f64::consts::FRAC_PI_2 {
        return None;
    }
    let half = (2.0 * ratio.asin()).to_degrees().max(lat_deg);
    (center.lon.abs() + half < 180.0).then_some(half)
}

impl std::fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("annotated", &self.edge_travel_s.get().is_some())
            .finish()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node (stable), constructs the CSR arrays, and
/// bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use mr_core::Coordinate;
/// use mr_spatial::{EdgeAttrs, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(Coordinate::new(30.69, -88.04));
/// let c = b.add_node(Coordinate::new(30.70, -88.03));
/// b.add_road(a, c, EdgeAttrs::new(1_200.0));
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:        Vec<Coordinate>,
    external_ids: Vec<i64>,
    raw_edges:    Vec<RawEdge>,
}

/// Which way traffic may travel along a segment `a → b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
    Both,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), external_ids: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:        Vec::with_capacity(nodes),
            external_ids: Vec::with_capacity(nodes),
            raw_edges:    Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).  The external
    /// id defaults to the `NodeId` value.
    pub fn add_node(&mut self, pos: Coordinate) -> NodeId {
        let external = self.nodes.len() as i64;
        self.add_node_with_external_id(external, pos)
    }

    /// Add a node that carries its identifier from the source dataset.
    pub fn add_node_with_external_id(&mut self, external_id: i64, pos: Coordinate) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external_ids.push(external_id);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// Adding the same pair twice creates parallel edges.
    ///
    /// # Panics
    ///
    /// Panics if either node was not returned by this builder.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        assert!(from.index() < self.nodes.len(), "unknown source node {from}");
        assert!(to.index() < self.nodes.len(), "unknown target node {to}");
        self.raw_edges.push(RawEdge { from, to, attrs });
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        self.add_directed_edge(a, b, attrs);
        self.add_directed_edge(b, a, attrs);
    }

    /// Add a road segment `a → b` travelled in `direction`.
    pub(crate) fn add_segment(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs, direction: Direction) {
        match direction {
            Direction::Forward  => self.add_directed_edge(a, b, attrs),
            Direction::Backward => self.add_directed_edge(b, a, attrs),
            Direction::Both     => self.add_road(a, b, attrs),
        }
    }

    /// Position of a node added earlier (used by loaders to compute edge
    /// lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps parallel edges in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:         Vec<NodeId>            = raw.iter().map(|e| e.from).collect();
        let edge_to:           Vec<NodeId>            = raw.iter().map(|e| e.to).collect();
        let edge_length_m:     Vec<f64>               = raw.iter().map(|e| e.attrs.length_m).collect();
        let edge_class:        Vec<Option<RoadClass>> = raw.iter().map(|e| e.attrs.class).collect();
        let edge_maxspeed_kmh: Vec<Option<f64>>       = raw.iter().map(|e| e.attrs.maxspeed_kmh).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.to_unit_vector(),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph {
            node_pos: self.nodes,
            node_external_id: self.external_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_class,
            edge_maxspeed_kmh,
            edge_travel_s: OnceLock::new(),
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
