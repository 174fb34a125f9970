//! Built-in Mobile, AL dataset used when no data files are given.
//!
//! Seven intersections joined by a mix of arterials (posted speeds) and
//! residential streets (no speed tag), plus four healthcare-related points.

use mr_core::{Coordinate, RoadClass};
use mr_facility::Facility;
use mr_spatial::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

/// Default origin: a house in midtown.
pub const DEFAULT_ORIGIN: Coordinate = Coordinate { lat: 30.692, lon: -88.075 };

/// Build the road graph.
pub fn road_graph() -> RoadGraph {
    let mut b = RoadGraphBuilder::new();

    let north_residential = b.add_node(Coordinate::new(30.710, -88.070));
    let south_residential = b.add_node(Coordinate::new(30.670, -88.030));
    let downtown          = b.add_node(Coordinate::new(30.695, -88.050));
    let commerce_park     = b.add_node(Coordinate::new(30.700, -88.030));
    let connector         = b.add_node(Coordinate::new(30.680, -88.060));
    let midtown           = b.add_node(Coordinate::new(30.690, -88.080));
    let hospital_district = b.add_node(Coordinate::new(30.705, -88.045));

    let arterial = |m: f64, kmh: f64| EdgeAttrs::new(m).with_class(RoadClass::Primary).with_maxspeed(kmh);
    let street = |m: f64| EdgeAttrs::new(m).with_class(RoadClass::Residential);

    b.add_road(north_residential, downtown,          arterial(2_500.0, 55.0));
    b.add_road(north_residential, connector,         street(3_600.0));
    b.add_road(connector,         downtown,          arterial(1_800.0, 45.0));
    b.add_road(south_residential, connector,         street(3_400.0));
    b.add_road(south_residential, commerce_park,     arterial(3_500.0, 65.0));
    b.add_road(downtown,          commerce_park,     arterial(2_100.0, 45.0));
    b.add_road(midtown,           connector,         street(2_400.0));
    b.add_road(midtown,           north_residential, street(2_400.0));
    b.add_road(downtown,          hospital_district, arterial(1_300.0, 40.0));
    b.add_road(hospital_district, commerce_park,     street(1_900.0));

    b.build()
}

/// Candidate facilities in dataset order.
pub fn facilities() -> Vec<Facility> {
    vec![
        Facility::new(Coordinate::new(30.7052, -88.0447))
            .with_name("Mobile Infirmary")
            .with_tag("amenity", "hospital")
            .with_tag("emergency", "yes"),
        Facility::new(Coordinate::new(30.7120, -88.0680))
            .with_name("Springhill Family Clinic")
            .with_tag("amenity", "clinic"),
        Facility::new(Coordinate::new(30.6950, -88.0510))
            .with_name("Downtown Pharmacy")
            .with_tag("amenity", "pharmacy"),
        Facility::new(Coordinate::new(30.6710, -88.0310))
            .with_tag("healthcare", "dentist"),
    ]
}
