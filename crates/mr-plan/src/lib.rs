//! `mr-plan` — nearest-facility route planning.
//!
//! Composes the facility ranker (`mr-facility`) with graph snapping and
//! routing (`mr-spatial`) behind one call:
//!
//! ```rust,ignore
//! use mr_plan::{Planner, PlannerConfig};
//! use mr_spatial::RegionGraphProvider;
//! use mr_facility::RegionFacilityProvider;
//!
//! let planner = Planner::new(
//!     RegionGraphProvider::new(region_graph),
//!     RegionFacilityProvider::new(facilities),
//!     PlannerConfig::default(),
//! )?;
//! let summary = planner.plan_route(Coordinate::new(12.9716, 77.5946))?;
//! println!("{}: {:.1} m, {:.1} min", summary.facility_name(), summary.distance_m, summary.travel_time_min);
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                |
//! |------------|-------------------------------------------------------|
//! | `parallel` | `Planner::plan_many` runs on Rayon's thread pool.     |

pub mod config;
pub mod error;
pub mod planner;
pub mod summary;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_RADII_M, PlannerConfig};
pub use error::{ErrorKind, PlanError, PlanResult};
pub use planner::Planner;
pub use summary::RouteSummary;
