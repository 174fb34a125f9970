//! Road-graph acquisition: the provider trait, a region-backed provider, and
//! a per-cell cache.
//!
//! Providers hand out `Arc<RoadGraph>` so one graph can back many concurrent
//! requests.  A shared graph is read-only apart from its write-once weight
//! annotation (see [`crate::weights`]).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mr_core::Coordinate;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{RoadGraph, SpatialResult};

// ── Provider trait ────────────────────────────────────────────────────────────

/// Source of drivable road graphs around a point.
pub trait RoadGraphProvider: Send + Sync {
    /// Return the road network within `radius_m` of `center`.
    ///
    /// The graph may be empty; callers detect that when snapping.
    fn fetch(&self, center: Coordinate, radius_m: f64) -> SpatialResult<Arc<RoadGraph>>;
}

impl<P: RoadGraphProvider + ?Sized> RoadGraphProvider for Arc<P> {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> SpatialResult<Arc<RoadGraph>> {
        (**self).fetch(center, radius_m)
    }
}

// ── RegionGraphProvider ───────────────────────────────────────────────────────

/// Serves induced subgraphs of one preloaded region graph (a city extract
/// loaded from CSV or OSM PBF).
pub struct RegionGraphProvider {
    region: RoadGraph,
}

impl RegionGraphProvider {
    pub fn new(region: RoadGraph) -> Self {
        Self { region }
    }
}

impl RoadGraphProvider for RegionGraphProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> SpatialResult<Arc<RoadGraph>> {
        let graph = self.region.subgraph_within(center, radius_m);
        debug!(
            %center,
            radius_m,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "extracted region subgraph"
        );
        Ok(Arc::new(graph))
    }
}

// ── GraphCache ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellKey {
    lat_cell: i64,
    lon_cell: i64,
    radius_m: u64,
}

/// One cache cell.  `None` until its first successful fetch.
type Slot = Arc<Mutex<Option<Arc<RoadGraph>>>>;

/// Caches graphs from an inner provider keyed by a lat/lon grid cell and the
/// requested radius.
///
/// A miss fetches around the cell centre with the radius grown by the cell's
/// half-diagonal, so the cached graph covers the request from any point in
/// the cell.
///
/// The map lock is only held to look up a cell's slot.  A miss is fetched
/// under that slot's own lock: concurrent requests for the same cell trigger
/// one fetch, and requests for other cells are not blocked by it.  A failed
/// fetch leaves the slot empty and the next request retries.
pub struct GraphCache<P> {
    inner: P,
    cell_deg: f64,
    entries: Mutex<FxHashMap<CellKey, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: RoadGraphProvider> GraphCache<P> {
    /// # Panics
    /// If `cell_deg` is not a positive finite number.
    pub fn new(inner: P, cell_deg: f64) -> Self {
        assert!(cell_deg.is_finite() && cell_deg > 0.0, "cell size must be positive");
        Self {
            inner,
            cell_deg,
            entries: Mutex::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached graphs.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn key(&self, center: Coordinate, radius_m: f64) -> CellKey {
        CellKey {
            lat_cell: (center.lat / self.cell_deg).floor() as i64,
            lon_cell: (center.lon / self.cell_deg).floor() as i64,
            radius_m: radius_m.ceil().max(0.0) as u64,
        }
    }

    fn cell_center(&self, key: CellKey) -> Coordinate {
        Coordinate::new(
            (key.lat_cell as f64 + 0.5) * self.cell_deg,
            (key.lon_cell as f64 + 0.5) * self.cell_deg,
        )
    }

    /// Largest distance from the cell centre to any of the cell's corners.
    fn cell_half_diagonal_m(&self, key: CellKey) -> f64 {
        let center = self.cell_center(key);
        let half = self.cell_deg * 0.5;
        [(-half, -half), (-half, half), (half, -half), (half, half)]
            .into_iter()
            .map(|(dlat, dlon)| {
                let lat = (center.lat + dlat).clamp(-90.0, 90.0);
                center.distance_m(Coordinate::new(lat, center.lon + dlon))
            })
            .fold(0.0, f64::max)
    }
}

impl<P: RoadGraphProvider> RoadGraphProvider for GraphCache<P> {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> SpatialResult<Arc<RoadGraph>> {
        let key = self.key(center, radius_m);
        let slot: Slot = Arc::clone(self.entries.lock().entry(key).or_default());

        let mut cached = slot.lock();
        if let Some(graph) = cached.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(?key, "graph cache hit");
            return Ok(Arc::clone(graph));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fetch_center = self.cell_center(key);
        let fetch_radius = radius_m + self.cell_half_diagonal_m(key);
        debug!(?key, %fetch_center, fetch_radius, "graph cache miss");

        let graph = self.inner.fetch(fetch_center, fetch_radius)?;
        *cached = Some(Arc::clone(&graph));
        Ok(graph)
    }
}
