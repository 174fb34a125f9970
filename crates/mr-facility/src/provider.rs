//! Facility acquisition: the provider trait and a region-backed provider.

use std::sync::Arc;

use mr_core::Coordinate;
use tracing::debug;

use crate::{Facility, FacilityResult, FacilityTags};

/// Source of candidate facilities around a point.
pub trait FacilityProvider: Send + Sync {
    /// Facilities within `radius_m` of `center` that match `tags`.
    ///
    /// May return an empty set.  Order is the dataset order, which the
    /// ranker uses to break distance ties.
    fn fetch(&self, center: Coordinate, radius_m: f64, tags: &FacilityTags) -> FacilityResult<Vec<Facility>>;
}

impl<P: FacilityProvider + ?Sized> FacilityProvider for Arc<P> {
    fn fetch(&self, center: Coordinate, radius_m: f64, tags: &FacilityTags) -> FacilityResult<Vec<Facility>> {
        (**self).fetch(center, radius_m, tags)
    }
}

/// Serves facilities from one preloaded list (a city extract loaded from CSV
/// or OSM PBF).
#[derive(Clone, Debug, Default)]
pub struct RegionFacilityProvider {
    facilities: Vec<Facility>,
}

impl RegionFacilityProvider {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl FacilityProvider for RegionFacilityProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64, tags: &FacilityTags) -> FacilityResult<Vec<Facility>> {
        let found: Vec<Facility> = self
            .facilities
            .iter()
            .filter(|f| tags.matches(&f.tags) && center.distance_m(f.coordinate) <= radius_m)
            .cloned()
            .collect();
        debug!(%center, radius_m, found = found.len(), "filtered region facilities");
        Ok(found)
    }
}
