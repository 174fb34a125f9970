//! Nearest-candidate selection with radius expansion.
//!
//! # Policy
//!
//! [`select_best`] walks the configured radii in order and stops at the
//! **first** radius whose candidate set is non-empty, returning its nearest
//! member.  A farther radius is never consulted once a nearer one produced
//! candidates, even if it would contain something closer to the origin.
//!
//! Distances are great-circle (haversine).  Equal distances keep candidate
//! order, so the first facility in the dataset wins a tie.

use std::cmp::Ordering;

use mr_core::Coordinate;
use tracing::{debug, warn};

use crate::{Facility, FacilityError, FacilityResult, RankedFacility};

/// Rank `facilities` by ascending distance from `origin`.
///
/// The sort is stable.  Facilities whose centroid is not a valid coordinate
/// are skipped with a warning.
pub fn rank(facilities: &[Facility], origin: Coordinate) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = facilities
        .iter()
        .enumerate()
        .filter_map(|(index, f)| measure(f, index, origin))
        .collect();
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked
}

/// The nearest of `facilities` to `origin`, without sorting the rest.
pub fn nearest(facilities: &[Facility], origin: Coordinate) -> Option<RankedFacility> {
    let mut best: Option<(usize, f64)> = None;
    for (index, f) in facilities.iter().enumerate() {
        let Some(d) = distance_to(f, index, origin) else { continue };
        // Strict `<` keeps the earliest facility on ties.
        if best.is_none_or(|(_, b)| d.total_cmp(&b) == Ordering::Less) {
            best = Some((index, d));
        }
    }
    best.map(|(index, distance_m)| RankedFacility {
        facility: facilities[index].clone(),
        distance_m,
        index,
        radius_m: None,
    })
}

/// Check that every radius is finite and positive.
pub fn validate_radii(radii: &[f64]) -> FacilityResult<()> {
    match radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
        Some(&bad) => Err(FacilityError::InvalidRadius(bad)),
        None => Ok(()),
    }
}

/// Fetch candidates at each radius in turn and return the nearest member of
/// the first non-empty set.
///
/// `fetch` is called with each radius until one yields a usable candidate.
/// A fetch error aborts the search and is returned unchanged; it is not
/// treated as an empty set.
///
/// # Errors
///
/// - [`FacilityError::InvalidRadius`] if any radius is not finite and
///   positive (checked before any fetch).
/// - [`FacilityError::NoFacilityFound`] if `radii` is empty or every radius
///   yields no valid candidate.
pub fn select_best<F>(origin: Coordinate, radii: &[f64], mut fetch: F) -> FacilityResult<RankedFacility>
where
    F: FnMut(f64) -> FacilityResult<Vec<Facility>>,
{
    validate_radii(radii)?;

    for &radius_m in radii {
        let candidates = fetch(radius_m)?;
        debug!(radius_m, candidates = candidates.len(), "fetched facility candidates");

        if let Some(mut best) = nearest(&candidates, origin) {
            best.radius_m = Some(radius_m);
            debug!(
                radius_m,
                distance_m = best.distance_m,
                name = best.facility.display_name(),
                "selected nearest facility"
            );
            return Ok(best);
        }
    }

    Err(FacilityError::NoFacilityFound { radii: radii.to_vec() })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn distance_to(f: &Facility, index: usize, origin: Coordinate) -> Option<f64> {
    if !f.coordinate.is_valid() {
        warn!(
            index,
            name = f.display_name(),
            lat = f.coordinate.lat,
            lon = f.coordinate.lon,
            "skipping facility with invalid centroid"
        );
        return None;
    }
    Some(origin.distance_m(f.coordinate))
}

fn measure(f: &Facility, index: usize, origin: Coordinate) -> Option<RankedFacility> {
    distance_to(f, index, origin).map(|distance_m| RankedFacility {
        facility: f.clone(),
        distance_m,
        index,
        radius_m: None,
    })
}
