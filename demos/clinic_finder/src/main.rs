//! clinic_finder — nearest medical facility and fastest driving route.
//!
//! Loads a road graph and facility list (CSV files, an OSM PBF extract with
//! the `osm` feature, or the built-in Mobile, AL dataset), plans a route from
//! each `--origin` to its nearest facility, and writes a GeoJSON map plus
//! CSV route tables.
//!
//! ```text
//! clinic_finder --origin 30.692,-88.075
//! clinic_finder --nodes nodes.csv --edges edges.csv --facilities facilities.csv \
//!               --origin 12.9716,77.5946 --radius 3000 --radius 8000
//! RUST_LOG=mr_plan=debug clinic_finder --config planner.json
//! ```

mod city;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mr_core::Coordinate;
use mr_facility::{Facility, RegionFacilityProvider, load_facilities_csv};
use mr_output::{CsvRouteWriter, GeoJsonWriter, RouteWriter, error_document, user_message};
use mr_plan::{Planner, PlannerConfig};
use mr_spatial::{GraphCache, RegionGraphProvider, RoadGraph, load_graph_csv};

/// Grid cell size for the road-graph cache (≈1.1 km of latitude).
const CACHE_CELL_DEG: f64 = 0.01;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Origin as "lat,lon".  Repeat to plan several routes.
    #[arg(short, long, allow_hyphen_values = true)]
    origin: Vec<Coordinate>,

    /// Road nodes CSV (node_id,lat,lon).  Requires --edges.
    #[arg(long, requires = "edges")]
    nodes: Option<PathBuf>,

    /// Road edges CSV (from,to,length_m,highway,maxspeed_kmh,oneway).
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,

    /// Facilities CSV (name,lat,lon,tags).
    #[arg(long)]
    facilities: Option<PathBuf>,

    /// OSM PBF extract providing both roads and facilities.
    #[cfg(feature = "osm")]
    #[arg(long, conflicts_with_all = ["nodes", "edges", "facilities"])]
    pbf: Option<PathBuf>,

    /// Planner configuration JSON.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Facility search radius in metres.  Repeat to set the expansion order.
    #[arg(short, long = "radius")]
    radii: Vec<f64>,

    /// Road graph radius in metres (default: the facility search radius).
    #[arg(long)]
    graph_radius: Option<f64>,

    /// Speed in km/h for roads without speed data.
    #[arg(long)]
    fallback_speed: Option<f64>,

    /// Output directory.
    #[arg(long, default_value = "output/clinic_finder")]
    out: PathBuf,

    /// Log at debug level (ignored when RUST_LOG is set).
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.debug { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== clinic_finder: nearest facility routing ===");

    // 1. Configuration: file, then CLI overrides.
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::load_json(path)?,
        None => PlannerConfig::default(),
    };
    if !cli.radii.is_empty() {
        config.radii_m = cli.radii.clone();
    }
    if let Some(r) = cli.graph_radius {
        config.graph_radius_m = Some(r);
    }
    if let Some(kmh) = cli.fallback_speed {
        config.fallback_speed_kmh = kmh;
    }
    config.validate()?;
    println!(
        "Radii: {:?} m  |  Fallback speed: {} km/h  |  Distance: {:?}",
        config.radii_m, config.fallback_speed_kmh, config.distance_basis
    );

    // 2. Region data.
    let t0 = Instant::now();
    let (graph, facilities) = load_region(&cli, &config)?;
    println!(
        "Region: {} nodes, {} edges, {} facilities (loaded in {:.3} s)",
        graph.node_count(),
        graph.edge_count(),
        facilities.len(),
        t0.elapsed().as_secs_f64()
    );
    if graph.is_empty() {
        warn!("region road graph is empty; every request will fail");
    }

    // 3. Planner over a cached region provider.
    let graphs = Arc::new(GraphCache::new(RegionGraphProvider::new(graph), CACHE_CELL_DEG));
    let planner = Planner::new(Arc::clone(&graphs), RegionFacilityProvider::new(facilities), config)?;

    let origins = if cli.origin.is_empty() { vec![city::DEFAULT_ORIGIN] } else { cli.origin.clone() };
    println!("Planning {} route(s)", origins.len());
    println!();

    // 4. Plan.
    let t1 = Instant::now();
    let results = planner.plan_many(&origins);
    let elapsed = t1.elapsed();

    // 5. Output.
    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating output directory {}", cli.out.display()))?;
    let mut csv = CsvRouteWriter::new(&cli.out)?;
    let mut maps = GeoJsonWriter::new(&cli.out)?;

    println!(
        "{:<24} {:<28} {:>12} {:>10} {:>6}",
        "Origin", "Facility", "Distance m", "Time min", "Hops"
    );
    println!("{}", "-".repeat(84));

    let mut failures = 0usize;
    for (origin, result) in origins.iter().zip(&results) {
        match result {
            Ok(summary) => {
                csv.write_route(summary)?;
                maps.write_route(summary)?;
                println!(
                    "{:<24} {:<28} {:>12.1} {:>10.1} {:>6}",
                    origin.to_string(),
                    summary.facility_name(),
                    summary.distance_m,
                    summary.travel_time_min,
                    summary.hop_count(),
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:<24} {}", origin.to_string(), user_message(e.kind()));
                eprintln!("{}", serde_json::to_string(&error_document(e))?);
            }
        }
    }
    csv.finish()?;
    maps.finish()?;

    println!();
    println!(
        "Planned {} route(s) in {:.3} s  |  graph cache: {} hit(s), {} miss(es)",
        origins.len() - failures,
        elapsed.as_secs_f64(),
        graphs.hits(),
        graphs.misses()
    );
    for path in maps.written() {
        info!(path = %path.display(), "wrote route map");
    }

    if failures == origins.len() {
        bail!("no route could be planned");
    }
    Ok(())
}

/// Load the region graph and facility list from whichever source the
/// command line names.
fn load_region(cli: &Cli, config: &PlannerConfig) -> Result<(RoadGraph, Vec<Facility>)> {
    #[cfg(feature = "osm")]
    if let Some(pbf) = &cli.pbf {
        let graph = mr_spatial::osm::load_graph_pbf(pbf)?;
        let facilities = mr_facility::osm::load_facilities_pbf(pbf, &config.facility_tags)?;
        return Ok((graph, facilities));
    }
    #[cfg(not(feature = "osm"))]
    let _ = config;

    let graph = match (&cli.nodes, &cli.edges) {
        (Some(nodes), Some(edges)) => load_graph_csv(nodes, edges)
            .with_context(|| format!("loading road graph from {}", nodes.display()))?,
        _ => city::road_graph(),
    };
    let facilities = match &cli.facilities {
        Some(path) => load_facilities_csv(path)
            .with_context(|| format!("loading facilities from {}", path.display()))?,
        None => city::facilities(),
    };
    Ok((graph, facilities))
}
