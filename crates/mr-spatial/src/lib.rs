//! `mr-spatial` — road graph, node snapping, and travel-time routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                           |
//! |--------------|--------------------------------------------------------------------|
//! | [`graph`]    | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `EdgeAttrs`         |
//! | [`weights`]  | `SpeedPolicy`, write-once travel-time annotation, `parse_maxspeed`  |
//! | [`engine`]   | `RouteEngine` trait, `DijkstraEngine`, `Path`, `path_metrics`       |
//! | [`provider`] | `RoadGraphProvider`, `RegionGraphProvider`, `GraphCache`            |
//! | [`loader`]   | `load_graph_csv`                                                    |
//! | [`osm`]      | `load_graph_pbf` (feature = `"osm"` only)                          |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod engine;
pub mod error;
pub mod graph;
pub mod loader;
pub mod provider;
pub mod weights;

#[cfg(feature = "osm")]
pub mod osm;


pub use engine::{DijkstraEngine, DistanceBasis, Path, PathMetrics, RouteEngine, path_metrics};
pub use error::{SpatialError, SpatialResult};
pub use graph::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
pub use loader::{load_graph_csv, load_graph_reader};
pub use provider::{GraphCache, RegionGraphProvider, RoadGraphProvider};
pub use weights::{DEFAULT_FALLBACK_SPEED_KMH, SpeedPolicy, derive_travel_times, parse_maxspeed};
