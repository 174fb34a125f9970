//! Planner configuration.
//!
//! Every field has a default, so a JSON file only needs the fields it
//! changes:
//!
//! ```json
//! { "radii_m": [3000, 8000], "fallback_speed_kmh": 40 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use mr_facility::{FacilityTags, validate_radii};
use mr_spatial::{DEFAULT_FALLBACK_SPEED_KMH, DistanceBasis, SpeedPolicy};

use crate::{PlanError, PlanResult};

/// Search radii tried in order when looking for a facility.
pub const DEFAULT_RADII_M: [f64; 2] = [5_000.0, 10_000.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Facility search radii in metres, tried in order; the first radius
    /// with any candidate wins.
    pub radii_m: Vec<f64>,

    /// Radius of the road graph fetched around the origin.  `None` uses the
    /// radius at which the facility was found.
    pub graph_radius_m: Option<f64>,

    /// Speed for edges with no usable speed metadata.
    pub fallback_speed_kmh: f64,

    /// Fill missing edge speeds with the per-road-class mean.
    pub impute_speeds: bool,

    /// How route distance is summed.
    pub distance_basis: DistanceBasis,

    /// Which facilities count as candidates.
    pub facility_tags: FacilityTags,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            radii_m:            DEFAULT_RADII_M.to_vec(),
            graph_radius_m:     None,
            fallback_speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
            impute_speeds:      true,
            distance_basis:     DistanceBasis::GreatCircle,
            facility_tags:      FacilityTags::medical(),
        }
    }
}

impl PlannerConfig {
    /// Reject configurations the planner cannot run with.
    pub fn validate(&self) -> PlanResult<()> {
        if self.radii_m.is_empty() {
            return Err(PlanError::Config("radii_m must not be empty".into()));
        }
        validate_radii(&self.radii_m).map_err(|e| PlanError::Config(e.to_string()))?;
        if let Some(r) = self.graph_radius_m.filter(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(PlanError::Config(format!("graph_radius_m {r} must be finite and positive")));
        }
        if !(self.fallback_speed_kmh.is_finite() && self.fallback_speed_kmh > 0.0) {
            return Err(PlanError::Config(format!(
                "fallback_speed_kmh {} must be finite and positive",
                self.fallback_speed_kmh
            )));
        }
        Ok(())
    }

    pub fn speed_policy(&self) -> SpeedPolicy {
        SpeedPolicy { fallback_kmh: self.fallback_speed_kmh, impute_by_class: self.impute_speeds }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> PlanResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| PlanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn load_json(path: &Path) -> PlanResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
