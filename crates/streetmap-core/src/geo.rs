//! Geographic coordinate type and the equirectangular projection shared by
//! every distance/area/angle calculation in the routing engine.
//!
//! `GeoPoint` uses `f64` latitude/longitude (unlike `dt-core`'s `f32`
//! `GeoPoint`, which this type is otherwise modelled on) — the original
//! course implementation this engine is ported from computes in `double`,
//! and the testable float-tolerance equalities hold more comfortably at
//! `f64` across the longer chains of trig in `turn_angle` and
//! `polygon_area`. See DESIGN.md.

use crate::error::{CoreError, CoreResult};

/// Mean Earth radius in metres, used by the equirectangular projection below.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validating constructor: rejects a latitude outside `[-90, 90]` or a
    /// longitude outside `[-180, 180]`. Prefer this over [`Self::new`] when
    /// the coordinates come from an untrusted loader rather than being
    /// constructed in-process (e.g. tests, synthetic maps).
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Distance in metres between `self` and `other` under an equirectangular
    /// projection centered on their average latitude:
    ///
    /// `x = R * lon * cos(lat_avg)`, `y = R * lat`, then ordinary Euclidean
    /// distance in the projected plane. Good to well under 1% error at
    /// city scale; degrades away from the projection's reference latitude,
    /// which is why it is always recomputed per query rather than cached
    /// against a single map-wide average.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let lat_avg = (lat1 + lat2) / 2.0;

        let y1 = EARTH_RADIUS_M * lat1;
        let y2 = EARTH_RADIUS_M * lat2;
        let x1 = EARTH_RADIUS_M * self.lon.to_radians() * lat_avg.cos();
        let x2 = EARTH_RADIUS_M * other.lon.to_radians() * lat_avg.cos();

        ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
    }

    /// Project to `(x, y)` metres using a caller-supplied reference latitude
    /// (radians) for the `cos` term. Used when several points must share one
    /// projection plane, e.g. the two vectors compared in `turn_angle`.
    #[inline]
    pub fn project(self, lat_avg_rad: f64) -> (f64, f64) {
        let x = EARTH_RADIUS_M * self.lon.to_radians() * lat_avg_rad.cos();
        let y = EARTH_RADIUS_M * self.lat.to_radians();
        (x, y)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Area in square metres of a closed polygon given as an ordered ring of
/// points (first and last must coincide). Returns `0.0` if there are fewer
/// than three points or the ring isn't closed — a non-polygon feature has no
/// area by definition (spec: `featureArea`).
///
/// Uses the same equirectangular projection as [`GeoPoint::distance_m`],
/// accumulating shoelace trapezoid contributions directly in projected
/// latitude/longitude rather than materializing `(x, y)` pairs first.
pub fn polygon_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let first = points[0];
    let last = points[points.len() - 1];
    if first.lat != last.lat || first.lon != last.lon {
        return 0.0;
    }

    let mut total = 0.0;
    for pair in points.windows(2) {
        let now = pair[0];
        let next = pair[1];

        let now_lat = now.lat.to_radians();
        let now_lon = now.lon.to_radians();
        let next_lat = next.lat.to_radians();
        let next_lon = next.lon.to_radians();
        let lat_avg = (now_lat + next_lat) / 2.0;

        total += EARTH_RADIUS_M
            * (next_lat - now_lat)
            * (EARTH_RADIUS_M * next_lon * lat_avg.cos() + EARTH_RADIUS_M * now_lon * lat_avg.cos())
            / 2.0;
    }
    total.abs()
}
