//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `routes.csv`: one row per route
//! - `route_points.csv`: one row per route node, in travel order

use std::fs::File;
use std::path::Path;

use csv::Writer;
use mr_plan::RouteSummary;

use crate::OutputResult;
use crate::writer::RouteWriter;

/// Writes planned routes to two CSV files.
pub struct CsvRouteWriter {
    routes:   Writer<File>,
    points:   Writer<File>,
    next_id:  u32,
    finished: bool,
}

impl CsvRouteWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut routes = Writer::from_path(dir.join("routes.csv"))?;
        routes.write_record([
            "route_id",
            "origin_lat",
            "origin_lon",
            "facility_name",
            "facility_lat",
            "facility_lon",
            "facility_distance_m",
            "route_distance_m",
            "travel_time_min",
            "hops",
        ])?;

        let mut points = Writer::from_path(dir.join("route_points.csv"))?;
        points.write_record(["route_id", "seq", "node_id", "lat", "lon", "cumulative_m"])?;

        Ok(Self { routes, points, next_id: 0, finished: false })
    }
}

impl RouteWriter for CsvRouteWriter {
    fn write_route(&mut self, summary: &RouteSummary) -> OutputResult<()> {
        let id = self.next_id;
        self.next_id += 1;

        let dest = summary.destination();
        self.routes.write_record(&[
            id.to_string(),
            summary.origin.lat.to_string(),
            summary.origin.lon.to_string(),
            summary.facility_name().to_owned(),
            dest.lat.to_string(),
            dest.lon.to_string(),
            format!("{:.1}", summary.facility.distance_m),
            format!("{:.1}", summary.distance_m),
            format!("{:.2}", summary.travel_time_min),
            summary.hop_count().to_string(),
        ])?;

        // Same hop distances, same order as `route_distance_m`.
        let mut cumulative_m = 0.0;
        let hops = std::iter::once(&0.0).chain(&summary.hop_distances_m);
        for (seq, ((&node, &pos), hop_m)) in
            summary.path.nodes().iter().zip(&summary.geometry).zip(hops).enumerate()
        {
            cumulative_m += *hop_m;
            self.points.write_record(&[
                id.to_string(),
                seq.to_string(),
                node.0.to_string(),
                pos.lat.to_string(),
                pos.lon.to_string(),
                format!("{cumulative_m:.1}"),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.routes.flush()?;
        self.points.flush()?;
        Ok(())
    }
}
