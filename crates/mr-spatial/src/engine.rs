//! Route engine trait, default Dijkstra implementation, and path metrics.
//!
//! # Pluggability
//!
//! The planner calls routing via the [`RouteEngine`] trait, so applications
//! can swap in other algorithms (A*, contraction hierarchies) without
//! touching the planner.  The default [`DijkstraEngine`] searches the whole
//! request graph, which is small (a few km around the user).
//!
//! # Cost units
//!
//! Costs are edge travel times in seconds (`f64`), as produced by
//! [`RoadGraph::annotate`].  [`PathMetrics`] reports minutes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mr_core::{EdgeId, NodeId};
use tracing::debug;

use crate::{RoadGraph, SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered node sequence from origin to destination, plus the exact edge
/// chosen for each hop.
///
/// Invariant: `edges.len() + 1 == nodes.len()`, and edge `i` runs from
/// `nodes[i]` to `nodes[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl Path {
    /// A path that starts and ends at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: Vec::new() }
    }

    /// Build a path by walking `edges` from `origin`, checking that each edge
    /// starts where the previous one ended.
    pub fn from_edges(graph: &RoadGraph, origin: NodeId, edges: Vec<EdgeId>) -> SpatialResult<Self> {
        if !graph.contains_node(origin) {
            return Err(SpatialError::NodeNotFound(origin));
        }
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(origin);
        let mut cur = origin;
        for &e in &edges {
            if e.index() >= graph.edge_count() {
                return Err(SpatialError::EdgeNotFound(e));
            }
            if graph.edge_from[e.index()] != cur {
                return Err(SpatialError::InvalidPath(format!("{e} does not start at {cur}")));
            }
            cur = graph.edge_to[e.index()];
            nodes.push(cur);
        }
        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of nodes (always ≥ 1).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// `true` if the origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

/// Which quantity `path_metrics` sums for distance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceBasis {
    /// Great-circle distance between consecutive path node coordinates.
    #[default]
    GreatCircle,
    /// Stored length of each traversed edge.
    EdgeLength,
}

/// Physical distance and travel time of one [`Path`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathMetrics {
    pub distance_m: f64,
    pub travel_time_min: f64,
    /// Distance of each hop under the chosen basis, one entry per path edge.
    /// `distance_m` is their running sum in path order.
    pub hop_distances_m: Vec<f64>,
}

/// Sum distance and travel time along `path`.
///
/// Time is the sum of the traversed edges' travel times, divided by 60.
/// Distance follows `basis`; both read the same hop sequence.  A trivial
/// path yields zero for both.
pub fn path_metrics(graph: &RoadGraph, path: &Path, basis: DistanceBasis) -> SpatialResult<PathMetrics> {
    let times = graph.travel_times()?;
    let mut hop_distances_m = Vec::with_capacity(path.edges().len());
    let mut distance_m = 0.0;
    let mut travel_s = 0.0;

    for (hop, &edge) in path.edges().iter().enumerate() {
        let e = edge.index();
        if e >= graph.edge_count() {
            return Err(SpatialError::EdgeNotFound(edge));
        }
        let hop_m = match basis {
            DistanceBasis::GreatCircle => {
                let a = graph.node_coordinate(path.nodes[hop])?;
                let b = graph.node_coordinate(path.nodes[hop + 1])?;
                a.distance_m(b)
            }
            DistanceBasis::EdgeLength => graph.edge_length_m[e],
        };
        distance_m += hop_m;
        hop_distances_m.push(hop_m);
        travel_s += times[e];
    }

    Ok(PathMetrics { distance_m, travel_time_min: travel_s / 60.0, hop_distances_m })
}

// ── RouteEngine trait ─────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so one engine can serve concurrent
/// requests.
pub trait RouteEngine: Send + Sync {
    /// Compute the minimum-travel-time path from `from` to `to`.
    ///
    /// `from == to` yields a trivial path.  Unreachable destinations fail
    /// with [`SpatialError::NoPath`].
    fn shortest_path(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Path>;
}

// ── DijkstraEngine ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR graph, using annotated travel times.
///
/// Every parallel edge is relaxed separately, so the fastest one between a
/// node pair is the one recorded in the path.  Among equally fast parallel
/// edges the lowest `EdgeId` wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraEngine;

impl RouteEngine for DijkstraEngine {
    fn shortest_path(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Path> {
        dijkstra(graph, from, to)
    }
}

/// Heap entry.  Ordered so `BinaryHeap` pops the lowest cost first, then the
/// lowest node id.
#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Path> {
    for node in [from, to] {
        if !graph.contains_node(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    let times = graph.travel_times()?;

    if from == to {
        return Ok(Path::trivial(from));
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled = 0usize;

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        settled += 1;

        if node == to {
            debug!(%from, %to, settled, travel_s = cost, "dijkstra reached destination");
            return Ok(reconstruct(graph, &prev_edge, from, to));
        }

        for edge in graph.out_edges(node) {
            let weight = times[edge.index()];
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SpatialError::InvalidEdgeWeight {
                    edge,
                    reason: format!("travel time {weight} s during search"),
                });
            }

            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + weight;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(State { cost: new_cost, node: neighbor });
            }
        }
    }

    debug!(%from, %to, settled, "dijkstra exhausted reachable set");
    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(graph: &RoadGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Path {
    let mut edges = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    edges.reverse();
    nodes.reverse();
    Path { nodes, edges }
}
