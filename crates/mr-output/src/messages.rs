//! User-facing messages for planner errors.

use mr_plan::{ErrorKind, PlanError};
use serde_json::{Value, json};

/// Short message suitable for showing to the person who asked for a route.
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NoFacilityFound   => "No hospitals or clinics found near your location.",
        ErrorKind::NoPath            => "No drivable route to the nearest facility was found.",
        ErrorKind::EmptyGraph        => "No road network is available around your location.",
        ErrorKind::InvalidInput      => "The location you supplied is not valid.",
        ErrorKind::InvalidEdgeWeight => "Road data for your area is inconsistent, so no route could be computed.",
        ErrorKind::Provider          => "Map data is temporarily unavailable. Please try again.",
        ErrorKind::Internal          => "Something went wrong while planning your route.",
    }
}

/// JSON error body: `{"error": {"kind", "message", "detail"}}`.
pub fn error_document(err: &PlanError) -> Value {
    let kind = err.kind();
    json!({
        "error": {
            "kind": kind.as_str(),
            "message": user_message(kind),
            "detail": err.to_string(),
        }
    })
}
