//! Unit tests for mr-facility.

#[cfg(test)]
mod helpers {
    use std::f64::consts::PI;

    use mr_core::{Coordinate, EARTH_RADIUS_M};
    use crate::Facility;

    pub const ORIGIN: Coordinate = Coordinate { lat: 0.0, lon: 0.0 };

    /// A point `m` metres due north of [`ORIGIN`].
    pub fn north(m: f64) -> Coordinate {
        Coordinate::new(m / (EARTH_RADIUS_M * PI / 180.0), 0.0)
    }

    pub fn hospital(name: &str, at: Coordinate) -> Facility {
        Facility::new(at).with_name(name).with_tag("amenity", "hospital")
    }
}

// ── Facility records ──────────────────────────────────────────────────────────

#[cfg(test)]
mod facility {
    use mr_core::Coordinate;
    use crate::{Facility, UNKNOWN_FACILITY_NAME};

    #[test]
    fn display_name_fallback() {
        let f = Facility::new(Coordinate::new(1.0, 2.0));
        assert_eq!(f.display_name(), UNKNOWN_FACILITY_NAME);
        assert_eq!(f.clone().with_name("  ").display_name(), "Unknown Facility");
        assert_eq!(f.with_name("St. Mary's").display_name(), "St. Mary's");
    }

    #[test]
    fn tag_lookup() {
        let f = Facility::new(Coordinate::new(1.0, 2.0))
            .with_tag("amenity", "clinic")
            .with_tag("emergency", "no");
        assert_eq!(f.tag("amenity"), Some("clinic"));
        assert_eq!(f.tag("healthcare"), None);
    }
}

// ── Tag filters ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tags {
    use crate::{FacilityTags, TagRule};

    #[test]
    fn medical_defaults() {
        let tags = FacilityTags::default();
        assert_eq!(tags, FacilityTags::medical());
        assert!(tags.matches(&[("amenity", "hospital")]));
        assert!(tags.matches(&[("amenity", "clinic")]));
        assert!(tags.matches(&[("amenity", "doctors")]));
        assert!(tags.matches(&[("healthcare", "dentist")]));
        assert!(tags.matches(&[("name", "X"), ("healthcare", "")]));
        assert!(!tags.matches(&[("amenity", "pharmacy")]));
        assert!(!tags.matches::<&str, &str>(&[]));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let tags = FacilityTags::new(Vec::new());
        assert!(tags.is_empty());
        assert!(tags.matches::<&str, &str>(&[]));
        assert!(tags.matches(&[("shop", "bakery")]));
    }

    #[test]
    fn custom_rule() {
        let tags = FacilityTags::new(vec![TagRule::one_of("emergency", ["yes"])]);
        assert!(tags.matches(&[("emergency".to_string(), "yes".to_string())]));
        assert!(!tags.matches(&[("amenity", "hospital")]));
        assert_eq!(tags.rules().len(), 1);
    }
}

// ── Ranking and selection ─────────────────────────────────────────────────────

#[cfg(test)]
mod ranker {
    use std::cell::RefCell;

    use mr_core::Coordinate;
    use super::helpers::{ORIGIN, hospital, north};
    use crate::{Facility, FacilityError, nearest, rank, select_best};

    #[test]
    fn rank_orders_by_distance() {
        let set = vec![
            hospital("far", north(900.0)),
            hospital("near", north(300.0)),
            hospital("mid", north(600.0)),
        ];
        let ranked = rank(&set, ORIGIN);
        let names: Vec<_> = ranked.iter().map(|r| r.facility.display_name()).collect();
        assert_eq!(names, ["near", "mid", "far"]);
        assert_eq!(ranked[0].index, 1);
        assert!((ranked[0].distance_m - 300.0).abs() < 1e-6);
        assert!(ranked.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
    }

    #[test]
    fn ties_keep_dataset_order() {
        let set = vec![
            hospital("second", north(500.0)),
            hospital("first", north(200.0)),
            hospital("third", north(200.0)),
        ];
        let ranked = rank(&set, ORIGIN);
        assert_eq!(ranked[0].facility.display_name(), "first");
        assert_eq!(ranked[1].facility.display_name(), "third");

        let best = nearest(&set, ORIGIN).unwrap();
        assert_eq!(best.facility.display_name(), "first");
        assert_eq!(best.index, 1);
    }

    #[test]
    fn invalid_centroid_is_skipped() {
        let set = vec![
            hospital("broken", Coordinate::new(f64::NAN, 0.0)),
            hospital("bad lat", Coordinate::new(120.0, 0.0)),
            hospital("ok", north(800.0)),
        ];
        assert_eq!(rank(&set, ORIGIN).len(), 1);
        assert_eq!(nearest(&set, ORIGIN).unwrap().facility.display_name(), "ok");
        assert!(nearest(&set[..2], ORIGIN).is_none());
    }

    #[test]
    fn nearer_of_two_within_first_radius() {
        let set = vec![hospital("900", north(900.0)), hospital("300", north(300.0))];
        let best = select_best(ORIGIN, &[5_000.0, 10_000.0], |_| Ok(set.clone())).unwrap();
        assert_eq!(best.facility.display_name(), "300");
        assert_eq!(best.radius_m, Some(5_000.0));
    }

    #[test]
    fn expands_to_second_radius() {
        let calls = RefCell::new(Vec::new());
        let best = select_best(ORIGIN, &[5_000.0, 10_000.0], |r| {
            calls.borrow_mut().push(r);
            Ok(if r < 10_000.0 { Vec::new() } else { vec![hospital("only", north(7_500.0))] })
        })
        .unwrap();
        assert_eq!(best.facility.display_name(), "only");
        assert_eq!(best.radius_m, Some(10_000.0));
        assert_eq!(*calls.borrow(), vec![5_000.0, 10_000.0]);
    }

    #[test]
    fn first_non_empty_radius_wins() {
        // The wider set holds a nearer facility, but it is never fetched.
        let calls = RefCell::new(0);
        let best = select_best(ORIGIN, &[5_000.0, 10_000.0], |r| {
            *calls.borrow_mut() += 1;
            Ok(if r < 10_000.0 {
                vec![hospital("inner", north(4_000.0))]
            } else {
                vec![hospital("closer", north(100.0))]
            })
        })
        .unwrap();
        assert_eq!(best.facility.display_name(), "inner");
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn nothing_found() {
        let err = select_best(ORIGIN, &[5_000.0, 10_000.0], |_| Ok(Vec::new())).unwrap_err();
        match err {
            FacilityError::NoFacilityFound { radii } => assert_eq!(radii, vec![5_000.0, 10_000.0]),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn empty_radius_list() {
        let err = select_best(ORIGIN, &[], |_| -> Result<Vec<Facility>, _> { unreachable!() }).unwrap_err();
        assert!(matches!(err, FacilityError::NoFacilityFound { .. }));
    }

    #[test]
    fn only_invalid_candidates_count_as_empty() {
        let best = select_best(ORIGIN, &[5_000.0, 10_000.0], |r| {
            Ok(if r < 10_000.0 {
                vec![hospital("broken", Coordinate::new(f64::NAN, f64::NAN))]
            } else {
                vec![hospital("fine", north(6_000.0))]
            })
        })
        .unwrap();
        assert_eq!(best.facility.display_name(), "fine");
    }

    #[test]
    fn invalid_radius_rejected_before_fetch() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = select_best(ORIGIN, &[5_000.0, bad], |_| -> Result<Vec<Facility>, _> {
                panic!("fetch must not run")
            })
            .unwrap_err();
            assert!(matches!(err, FacilityError::InvalidRadius(_)));
        }
    }

    #[test]
    fn provider_failure_is_not_empty() {
        let err = select_best(ORIGIN, &[5_000.0, 10_000.0], |_| {
            Err(FacilityError::Provider("overpass timeout".into()))
        })
        .unwrap_err();
        assert!(matches!(err, FacilityError::Provider(_)));
    }
}

// ── Providers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod provider {
    use std::sync::Arc;

    use mr_core::Coordinate;
    use super::helpers::{ORIGIN, hospital, north};
    use crate::{Facility, FacilityProvider, FacilityTags, RegionFacilityProvider};

    fn region() -> RegionFacilityProvider {
        RegionFacilityProvider::new(vec![
            hospital("b", north(3_000.0)),
            Facility::new(north(100.0)).with_name("pharmacy").with_tag("amenity", "pharmacy"),
            hospital("a", north(1_000.0)),
            Facility::new(north(7_000.0)).with_tag("healthcare", "clinic"),
        ])
    }

    #[test]
    fn filters_radius_and_tags() {
        let p = region();
        let found = p.fetch(ORIGIN, 5_000.0, &FacilityTags::medical()).unwrap();
        let names: Vec<_> = found.iter().map(Facility::display_name).collect();
        assert_eq!(names, ["b", "a"]);

        let wider = p.fetch(ORIGIN, 10_000.0, &FacilityTags::medical()).unwrap();
        assert_eq!(wider.len(), 3);
        assert_eq!(wider[2].display_name(), "Unknown Facility");
    }

    #[test]
    fn empty_result_is_ok() {
        let p = region();
        let found = p.fetch(Coordinate::new(45.0, 45.0), 5_000.0, &FacilityTags::medical()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn shared_provider() {
        let p: Arc<dyn FacilityProvider> = Arc::new(region());
        let all = p.fetch(ORIGIN, 10_000.0, &FacilityTags::new(Vec::new())).unwrap();
        assert_eq!(all.len(), 4);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use crate::{FacilityError, load_facilities_csv, load_facilities_reader, parse_tags};

    const CSV: &str = "\
name,lat,lon,tags
City General Hospital,12.9721,77.5933,amenity=hospital;emergency=yes
,12.9650,77.6010,healthcare=clinic
Corner Pharmacy,12.9700,77.6000,
";

    #[test]
    fn loads_rows_in_order() {
        let facilities = load_facilities_reader(CSV.as_bytes()).unwrap();
        assert_eq!(facilities.len(), 3);
        assert_eq!(facilities[0].display_name(), "City General Hospital");
        assert_eq!(facilities[0].tag("emergency"), Some("yes"));
        assert_eq!(facilities[1].name, None);
        assert_eq!(facilities[1].tag("healthcare"), Some("clinic"));
        assert!(facilities[2].tags.is_empty());
    }

    #[test]
    fn rejects_bad_coordinate() {
        let csv = "name,lat,lon,tags\nX,91.0,0.0,amenity=clinic\n";
        assert!(matches!(load_facilities_reader(csv.as_bytes()), Err(FacilityError::Parse(_))));
    }

    #[test]
    fn tag_parsing() {
        assert_eq!(
            parse_tags(" amenity = hospital ;; healthcare=").unwrap(),
            vec![
                ("amenity".to_string(), "hospital".to_string()),
                ("healthcare".to_string(), String::new()),
            ]
        );
        assert!(parse_tags("").unwrap().is_empty());
        assert!(parse_tags("amenity").is_err());
        assert!(parse_tags("=hospital").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("facilities.csv");
        std::fs::File::create(&path).unwrap().write_all(CSV.as_bytes()).unwrap();
        assert_eq!(load_facilities_csv(&path).unwrap().len(), 3);
        assert!(matches!(
            load_facilities_csv(&dir.path().join("nope.csv")),
            Err(FacilityError::Io(_))
        ));
    }
}
