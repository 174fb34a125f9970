//! OSM PBF facility extraction, enabled with the `osm` Cargo feature.
//!
//! Tagged nodes become point facilities.  Tagged ways (building outlines,
//! hospital campuses) become facilities at the mean of their member node
//! positions, the closing node of a closed way counted once.  Relations are
//! ignored.
//!
//! Output order: matching nodes in file order, then matching ways in file
//! order.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use mr_core::Coordinate;

use crate::{Facility, FacilityError, FacilityResult, FacilityTags};

struct TaggedWay {
    id:   i64,
    refs: Vec<i64>,
    tags: Vec<(String, String)>,
}

/// Load every facility matching `tags` from an OSM PBF file.
pub fn load_facilities_pbf(path: &Path, tags: &FacilityTags) -> FacilityResult<Vec<Facility>> {
    let reader = ElementReader::from_path(path).map_err(|e| FacilityError::Osm(e.to_string()))?;

    let mut node_pos: FxHashMap<i64, Coordinate> = FxHashMap::default();
    let mut facilities: Vec<Facility> = Vec::new();
    let mut ways: Vec<TaggedWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let pos = Coordinate::new(n.lat(), n.lon());
                node_pos.insert(n.id(), pos);
                let node_tags: Vec<(&str, &str)> = n.tags().collect();
                if !node_tags.is_empty() && tags.matches(&node_tags) {
                    facilities.push(facility(pos, &node_tags));
                }
            }
            Element::DenseNode(n) => {
                let pos = Coordinate::new(n.lat(), n.lon());
                node_pos.insert(n.id(), pos);
                let node_tags: Vec<(&str, &str)> = n.tags().collect();
                if !node_tags.is_empty() && tags.matches(&node_tags) {
                    facilities.push(facility(pos, &node_tags));
                }
            }
            Element::Way(w) => {
                let way_tags: Vec<(&str, &str)> = w.tags().collect();
                if !way_tags.is_empty() && tags.matches(&way_tags) {
                    ways.push(TaggedWay {
                        id:   w.id(),
                        refs: w.refs().collect(),
                        tags: way_tags.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect(),
                    });
                }
            }
            Element::Relation(_) => {}
        })
        .map_err(|e| FacilityError::Osm(e.to_string()))?;

    let point_count = facilities.len();
    for way in &ways {
        let mut refs = way.refs.as_slice();
        if refs.len() > 1 && refs.first() == refs.last() {
            refs = &refs[..refs.len() - 1];
        }
        let Some(centroid) = Coordinate::centroid(refs.iter().filter_map(|r| node_pos.get(r).copied())) else {
            warn!(way = way.id, "facility way has no resolvable nodes; skipped");
            continue;
        };
        let way_tags: Vec<(&str, &str)> = way.tags.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        facilities.push(facility(centroid, &way_tags));
    }

    info!(
        points = point_count,
        areas = facilities.len() - point_count,
        path = %path.display(),
        "loaded OSM facilities"
    );
    Ok(facilities)
}

fn facility(coordinate: Coordinate, tags: &[(&str, &str)]) -> Facility {
    Facility {
        coordinate,
        name: tags
            .iter()
            .find(|(k, _)| *k == "name")
            .map(|(_, v)| (*v).to_owned()),
        tags: tags.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect(),
    }
}
