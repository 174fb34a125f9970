//! `mr-facility` — candidate facilities and nearest-candidate selection.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`facility`] | `Facility`, `RankedFacility`                                  |
//! | [`tags`]     | `FacilityTags`, `TagRule` (default: medical facilities)       |
//! | [`ranker`]   | `rank`, `nearest`, `select_best` with radius expansion        |
//! | [`provider`] | `FacilityProvider` trait, `RegionFacilityProvider`            |
//! | [`loader`]   | `load_facilities_csv`                                         |
//! | [`osm`]      | `load_facilities_pbf` (feature = `"osm"` only)               |
//! | [`error`]    | `FacilityError`, `FacilityResult<T>`                         |

pub mod error;
pub mod facility;
pub mod loader;
pub mod provider;
pub mod ranker;
pub mod tags;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use error::{FacilityError, FacilityResult};
pub use facility::{Facility, RankedFacility, UNKNOWN_FACILITY_NAME};
pub use loader::{load_facilities_csv, load_facilities_reader, parse_tags};
pub use provider::{FacilityProvider, RegionFacilityProvider};
pub use ranker::{nearest, rank, select_best, validate_radii};
pub use tags::{FacilityTags, TagRule};
