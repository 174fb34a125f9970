//! `mr-output` — presentation of planned routes.
//!
//! | Module       | Output                                                     |
//! |--------------|------------------------------------------------------------|
//! | [`geojson`]  | Map document: origin marker, facility marker, route line   |
//! | [`csv`]      | `routes.csv`, `route_points.csv`                           |
//! | [`messages`] | User-facing text and JSON body for each planner error kind |
//!
//! Both file backends implement [`RouteWriter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use mr_output::{CsvRouteWriter, GeoJsonWriter, RouteWriter};
//!
//! let mut csv = CsvRouteWriter::new(Path::new("./output"))?;
//! let mut map = GeoJsonWriter::new(Path::new("./output"))?;
//! match planner.plan_route(origin) {
//!     Ok(summary) => {
//!         csv.write_route(&summary)?;
//!         map.write_route(&summary)?;
//!     }
//!     Err(e) => eprintln!("{}", mr_output::user_message(e.kind())),
//! }
//! csv.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod geojson;
pub mod messages;
pub mod writer;


pub use self::csv::CsvRouteWriter;
pub use error::{OutputError, OutputResult};
pub use geojson::{GeoJsonWriter, route_map, write_route_map};
pub use messages::{error_document, user_message};
pub use writer::RouteWriter;
