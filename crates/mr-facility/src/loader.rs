//! CSV facility loader.
//!
//! # CSV format
//!
//! ```csv
//! name,lat,lon,tags
//! City General Hospital,12.9721,77.5933,amenity=hospital;emergency=yes
//! ,12.9650,77.6010,healthcare=clinic
//! ```
//!
//! An empty `name` leaves the facility unnamed.  `tags` is a `;`-separated
//! list of `key=value` pairs and may be empty.  Rows keep file order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use mr_core::Coordinate;

use crate::{Facility, FacilityError, FacilityResult};

#[derive(Deserialize)]
struct FacilityRecord {
    name: Option<String>,
    lat:  f64,
    lon:  f64,
    tags: Option<String>,
}

/// Load facilities from a CSV file.
pub fn load_facilities_csv(path: &Path) -> FacilityResult<Vec<Facility>> {
    let facilities = load_facilities_reader(std::fs::File::open(path)?)?;
    info!(facilities = facilities.len(), path = %path.display(), "loaded facilities");
    Ok(facilities)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
pub fn load_facilities_reader<R: Read>(reader: R) -> FacilityResult<Vec<Facility>> {
    let mut facilities = Vec::new();
    for (row_no, row) in csv::Reader::from_reader(reader).deserialize::<FacilityRecord>().enumerate() {
        let row = row?;
        let coordinate = Coordinate::try_new(row.lat, row.lon)
            .map_err(|e| FacilityError::Parse(format!("row {}: {e}", row_no + 1)))?;
        let tags = match row.tags.as_deref() {
            Some(raw) => parse_tags(raw)?,
            None => Vec::new(),
        };
        facilities.push(Facility {
            coordinate,
            name: row.name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
            tags,
        });
    }
    Ok(facilities)
}

/// Parse `"k=v;k=v"` into `(key, value)` pairs.
///
/// Whitespace around keys and values is trimmed and empty entries are
/// ignored.  An entry without `=` or with an empty key is an error.
pub fn parse_tags(raw: &str) -> FacilityResult<Vec<(String, String)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (k, v) = entry
                .split_once('=')
                .ok_or_else(|| FacilityError::Parse(format!("tag {entry:?} is not key=value")))?;
            let k = k.trim();
            if k.is_empty() {
                return Err(FacilityError::Parse(format!("tag {entry:?} has an empty key")));
            }
            Ok((k.to_owned(), v.trim().to_owned()))
        })
        .collect()
}
