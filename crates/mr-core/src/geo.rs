//! Geographic coordinate type and spatial utilities.
//!
//! `Coordinate` uses `f64` latitude/longitude.  Facility ranking compares
//! distances of a few hundred metres against each other, so single precision
//! (≈1 m at the equator) would make ties depend on rounding.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Unchecked constructor.  Use [`Coordinate::try_new`] for untrusted input.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a coordinate, rejecting out-of-range or non-finite values.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let c = Self { lat, lon };
        if c.is_valid() {
            Ok(c)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// `true` if latitude ∈ [-90, 90] and longitude ∈ [-180, 180].
    ///
    /// NaN fails both range checks, so non-finite values are rejected too.
    #[inline]
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        // Clamp guards against a > 1 from rounding on antipodal points.
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_M * c
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Chord length between two such points is strictly monotonic in their
    /// great-circle distance, which makes it usable as an R-tree metric.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Approximate bounding-box check in degrees, for cheap rejection before
    /// calling [`distance_m`](Self::distance_m).
    #[inline]
    pub fn within_bbox(self, center: Coordinate, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }

    /// Arithmetic mean of a set of coordinates, `None` if the set is empty.
    ///
    /// Used as the centroid of small polygons (building outlines); adequate
    /// away from the antimeridian.
    pub fn centroid<I: IntoIterator<Item = Coordinate>>(points: I) -> Option<Coordinate> {
        let (mut lat, mut lon, mut n) = (0.0, 0.0, 0usize);
        for p in points {
            lat += p.lat;
            lon += p.lon;
            n += 1;
        }
        (n > 0).then(|| Coordinate::new(lat / n as f64, lon / n as f64))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Parse(format!("latitude {lat:?}: {e}")))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Parse(format!("longitude {lon:?}: {e}")))?;
        Coordinate::try_new(lat, lon)
    }
}
