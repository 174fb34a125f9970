//! `mr-core` — foundational types for the `medroute` workspace.
//!
//! This crate is a dependency of every other `mr-*` crate.  It has no `mr-*`
//! dependencies and a single external one (`thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                         |
//! |----------------|--------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`                               |
//! | [`geo`]        | `Coordinate`, haversine distance                 |
//! | [`road_class`] | `RoadClass` (OSM `highway` values)               |
//! | [`error`]      | `CoreError`, `CoreResult`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.    |

pub mod error;
pub mod geo;
pub mod ids;
pub mod road_class;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Coordinate, EARTH_RADIUS_M};
pub use ids::{EdgeId, NodeId};
pub use road_class::RoadClass;
