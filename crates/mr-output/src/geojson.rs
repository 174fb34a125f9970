//! GeoJSON map documents.
//!
//! A route map is a `FeatureCollection` with three features, in order:
//!
//! | `role`     | Geometry     | Notable properties                                |
//! |------------|--------------|---------------------------------------------------|
//! | `origin`   | `Point`      | `tooltip: "You"`, `popup: "Your Location"`        |
//! | `facility` | `Point`      | name tooltip; popup with distance and travel time |
//! | `route`    | `LineString` | `color`, `weight`, `opacity` for the polyline     |
//!
//! Positions are `[lon, lat]` per RFC 7946.  The collection's own
//! `properties` carry the map centre and zoom a viewer should start at.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use mr_core::Coordinate;
use mr_plan::RouteSummary;
use serde_json::{Value, json};

use crate::OutputResult;
use crate::writer::RouteWriter;

/// Initial zoom level suggested to map viewers.
pub const DEFAULT_ZOOM: u8 = 14;

fn position(c: Coordinate) -> Value {
    json!([c.lon, c.lat])
}

/// Popup text for the facility marker.
pub fn facility_popup(summary: &RouteSummary) -> String {
    format!(
        "{}\nDistance: {:.1} m\nEst. time: {:.1} mins",
        summary.facility_name(),
        summary.distance_m,
        summary.travel_time_min
    )
}

/// Build the map document for one route.
///
/// A trivial route (origin and facility on the same node) still yields a
/// valid two-position `LineString` by repeating its only point.
pub fn route_map(summary: &RouteSummary) -> Value {
    let mut line: Vec<Value> = summary.geometry.iter().map(|&c| position(c)).collect();
    if line.len() == 1 {
        line.push(line[0].clone());
    }

    json!({
        "type": "FeatureCollection",
        "properties": {
            "center": position(summary.origin),
            "zoom": DEFAULT_ZOOM,
        },
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": position(summary.origin) },
                "properties": {
                    "role": "origin",
                    "tooltip": "You",
                    "popup": "Your Location",
                },
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": position(summary.destination()) },
                "properties": {
                    "role": "facility",
                    "tooltip": summary.facility_name(),
                    "popup": facility_popup(summary),
                    "color": "red",
                    "icon": "plus-sign",
                    "facility_distance_m": summary.facility.distance_m,
                },
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": line },
                "properties": {
                    "role": "route",
                    "distance_m": summary.distance_m,
                    "travel_time_min": summary.travel_time_min,
                    "color": "blue",
                    "weight": 5,
                    "opacity": 0.8,
                },
            },
        ],
    })
}

/// Write the map document for `summary` to `path` (pretty-printed).
pub fn write_route_map(path: &Path, summary: &RouteSummary) -> OutputResult<()> {
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, &route_map(summary))?;
    Ok(())
}

/// Writes each route to `route_<n>.geojson` in a directory.
pub struct GeoJsonWriter {
    dir:     PathBuf,
    written: Vec<PathBuf>,
}

impl GeoJsonWriter {
    /// Create `dir` if needed.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), written: Vec::new() })
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RouteWriter for GeoJsonWriter {
    fn write_route(&mut self, summary: &RouteSummary) -> OutputResult<()> {
        let path = self.dir.join(format!("route_{}.geojson", self.written.len()));
        write_route_map(&path, summary)?;
        self.written.push(path);
        Ok(())
    }

    /// Each route is flushed when written.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
