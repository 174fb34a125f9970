//! Road classification shared by the graph loaders and the speed annotator.
//!
//! Variants follow the OSM `highway=*` values that carry car traffic.  A
//! class is only used to group edges for speed imputation; it never implies
//! a speed on its own.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Residential,
    LivingStreet,
    Service,
    /// Also used for drivable `highway` values not listed above.
    Unclassified,
}

impl RoadClass {
    /// Every variant, in declaration order.
    pub const ALL: [RoadClass; 14] = [
        RoadClass::Motorway,
        RoadClass::MotorwayLink,
        RoadClass::Trunk,
        RoadClass::TrunkLink,
        RoadClass::Primary,
        RoadClass::PrimaryLink,
        RoadClass::Secondary,
        RoadClass::SecondaryLink,
        RoadClass::Tertiary,
        RoadClass::TertiaryLink,
        RoadClass::Residential,
        RoadClass::LivingStreet,
        RoadClass::Service,
        RoadClass::Unclassified,
    ];

    /// Map an OSM `highway` value to a class, or `None` if the way is not
    /// drivable by car.
    pub fn from_highway(highway: &str) -> Option<RoadClass> {
        let class = match highway.trim() {
            "motorway"       => RoadClass::Motorway,
            "motorway_link"  => RoadClass::MotorwayLink,
            "trunk"          => RoadClass::Trunk,
            "trunk_link"     => RoadClass::TrunkLink,
            "primary"        => RoadClass::Primary,
            "primary_link"   => RoadClass::PrimaryLink,
            "secondary"      => RoadClass::Secondary,
            "secondary_link" => RoadClass::SecondaryLink,
            "tertiary"       => RoadClass::Tertiary,
            "tertiary_link"  => RoadClass::TertiaryLink,
            "residential"    => RoadClass::Residential,
            "living_street"  => RoadClass::LivingStreet,
            "service"        => RoadClass::Service,
            // Explicitly non-car:
            "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
            | "bridleway" | "corridor" | "elevator" | "escalator" | "platform"
            | "proposed" | "construction" | "abandoned" | "raceway"
            | "bus_guideway" | "busway" | "" => return None,
            // Unknown road type: keep it drivable rather than dropping it.
            _ => RoadClass::Unclassified,
        };
        Some(class)
    }

    /// Motorways are one-way by OSM convention unless tagged otherwise.
    #[inline]
    pub fn is_implicit_oneway(self) -> bool {
        matches!(self, RoadClass::Motorway | RoadClass::MotorwayLink)
    }

    /// The OSM `highway` value for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway      => "motorway",
            RoadClass::MotorwayLink  => "motorway_link",
            RoadClass::Trunk         => "trunk",
            RoadClass::TrunkLink     => "trunk_link",
            RoadClass::Primary       => "primary",
            RoadClass::PrimaryLink   => "primary_link",
            RoadClass::Secondary     => "secondary",
            RoadClass::SecondaryLink => "secondary_link",
            RoadClass::Tertiary      => "tertiary",
            RoadClass::TertiaryLink  => "tertiary_link",
            RoadClass::Residential   => "residential",
            RoadClass::LivingStreet  => "living_street",
            RoadClass::Service       => "service",
            RoadClass::Unclassified  => "unclassified",
        }
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
