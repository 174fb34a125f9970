//! Facility records.

use mr_core::Coordinate;

/// Display name used when a facility carries no `name`.
pub const UNKNOWN_FACILITY_NAME: &str = "Unknown Facility";

/// A candidate destination: a hospital, clinic, or similar point of care.
///
/// `coordinate` is the facility's centroid (the node itself for point
/// features, the mean of the outline for building polygons).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    pub coordinate: Coordinate,
    pub name: Option<String>,
    /// Source tags as `(key, value)` pairs, in source order.
    pub tags: Vec<(String, String)>,
}

impl Facility {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate, name: None, tags: Vec::new() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// The facility's name, or [`UNKNOWN_FACILITY_NAME`].
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_FACILITY_NAME,
        }
    }

    /// Value of the first tag named `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A facility with its great-circle distance from a query origin.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedFacility {
    pub facility: Facility,
    /// Great-circle distance from the origin to the centroid, in metres.
    pub distance_m: f64,
    /// Position of the facility in the candidate set it was ranked from.
    pub index: usize,
    /// Search radius that produced the candidate set, when ranked by
    /// [`select_best`](crate::select_best).
    pub radius_m: Option<f64>,
}
