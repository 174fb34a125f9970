//! Edge-weight annotation: length + speed → travel time.
//!
//! # Speed resolution
//!
//! For each edge, in order:
//!
//! 1. its own posted speed (`maxspeed`), if finite and positive;
//! 2. the mean posted speed of all edges of the same [`RoadClass`] in this
//!    graph (class imputation), if that class has any;
//! 3. [`SpeedPolicy::fallback_kmh`], 50 km/h by default.
//!
//! `travel_s = length_m / (speed_kmh / 3.6)`.  A result that is negative or
//! non-finite aborts the pass with [`SpatialError::InvalidEdgeWeight`].
//!
//! # Write-once
//!
//! The derived weights live in a `OnceLock` on the graph.  The first
//! successful call to [`RoadGraph::annotate`] freezes them; later calls
//! return the stored weights unchanged, whichever policy they pass.  A graph
//! shared between threads is therefore annotated exactly once.

use mr_core::{EdgeId, RoadClass};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{RoadGraph, SpatialError, SpatialResult};

/// Speed assumed for edges without any speed metadata.
pub const DEFAULT_FALLBACK_SPEED_KMH: f64 = 50.0;

/// How edge speeds are resolved during annotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedPolicy {
    /// Speed for edges with no posted speed and no imputable class.
    pub fallback_kmh: f64,
    /// Fill missing speeds with the per-class mean of posted speeds.
    pub impute_by_class: bool,
}

impl SpeedPolicy {
    pub fn with_fallback(fallback_kmh: f64) -> Self {
        Self { fallback_kmh, ..Self::default() }
    }
}

impl Default for SpeedPolicy {
    fn default() -> Self {
        Self { fallback_kmh: DEFAULT_FALLBACK_SPEED_KMH, impute_by_class: true }
    }
}

impl RoadGraph {
    /// Derive and freeze edge travel times.  Idempotent.
    pub fn annotate(&self, policy: &SpeedPolicy) -> SpatialResult<&[f64]> {
        if let Some(times) = self.edge_travel_s.get() {
            debug!("road graph already annotated; keeping existing weights");
            return Ok(times.as_slice());
        }
        let computed = derive_travel_times(self, policy)?;
        Ok(self.edge_travel_s.get_or_init(|| computed).as_slice())
    }

    /// `true` once [`annotate`](Self::annotate) has succeeded.
    pub fn is_annotated(&self) -> bool {
        self.edge_travel_s.get().is_some()
    }

    /// Per-edge travel times in seconds, indexed by `EdgeId`.
    pub fn travel_times(&self) -> SpatialResult<&[f64]> {
        self.edge_travel_s
            .get()
            .map(Vec::as_slice)
            .ok_or(SpatialError::NotAnnotated)
    }
}

/// Compute travel times for every edge of `graph` without storing them.
pub fn derive_travel_times(graph: &RoadGraph, policy: &SpeedPolicy) -> SpatialResult<Vec<f64>> {
    let class_means = if policy.impute_by_class {
        class_mean_speeds(graph)
    } else {
        FxHashMap::default()
    };

    let mut fallback_edges = 0usize;
    let mut times = Vec::with_capacity(graph.edge_count());

    for e in 0..graph.edge_count() {
        let edge = EdgeId(e as u32);
        let length_m = graph.edge_length_m[e];
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(SpatialError::InvalidEdgeWeight {
                edge,
                reason: format!("length {length_m} m is negative or not finite"),
            });
        }

        let speed_kmh = match graph.edge_maxspeed_kmh[e].filter(|&s| valid_speed(s)) {
            Some(posted) => posted,
            None => match graph.edge_class[e].and_then(|c| class_means.get(&c).copied()) {
                Some(imputed) => imputed,
                None => {
                    fallback_edges += 1;
                    policy.fallback_kmh
                }
            },
        };

        let travel_s = length_m / (speed_kmh / 3.6);
        if !(travel_s.is_finite() && travel_s >= 0.0) {
            return Err(SpatialError::InvalidEdgeWeight {
                edge,
                reason: format!(
                    "length {length_m} m at {speed_kmh} km/h gives travel time {travel_s} s"
                ),
            });
        }
        times.push(travel_s);
    }

    debug!(
        edges = graph.edge_count(),
        imputed_classes = class_means.len(),
        fallback_edges,
        fallback_kmh = policy.fallback_kmh,
        "derived edge travel times"
    );
    Ok(times)
}

/// Mean posted speed per road class, over edges that have one.
fn class_mean_speeds(graph: &RoadGraph) -> FxHashMap<RoadClass, f64> {
    let mut sums: FxHashMap<RoadClass, (f64, u32)> = FxHashMap::default();
    for (class, speed) in graph.edge_class.iter().zip(&graph.edge_maxspeed_kmh) {
        if let (Some(class), Some(speed)) = (class, speed.filter(|&s| valid_speed(s))) {
            let entry = sums.entry(*class).or_insert((0.0, 0));
            entry.0 += speed;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(class, (sum, n))| (class, sum / n as f64))
        .collect()
}

#[inline]
fn valid_speed(kmh: f64) -> bool {
    kmh.is_finite() && kmh > 0.0
}

/// Parse an OSM `maxspeed` value to km/h.
///
/// Accepts plain numbers (`"50"`), miles per hour (`"30 mph"`), knots
/// (`"10 knots"`), and `;`-separated lists (`"50;70"`, averaged).  Symbolic
/// values such as `"none"`, `"walk"` or `"RU:urban"` yield `None`.
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0u32;
    for part in raw.split(';') {
        let part = part.trim();
        let (number, factor) = if let Some(v) = part.strip_suffix("mph") {
            (v.trim(), 1.609_344)
        } else if let Some(v) = part.strip_suffix("knots") {
            (v.trim(), 1.852)
        } else if let Some(v) = part.strip_suffix("km/h") {
            (v.trim(), 1.0)
        } else {
            (part, 1.0)
        };
        let kmh = number.parse::<f64>().ok()? * factor;
        if !valid_speed(kmh) {
            return None;
        }
        sum += kmh;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}
