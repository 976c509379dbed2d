//! Short-range ground distance between two fixes

use crate::TrackPoint;

/// Earth radius at ground level for latitude 55.751244 (Moscow), in meters
pub const EARTH_RADIUS_M: f64 = 6_363_720.0;

/// Equirectangular (flat-earth) distance in meters between two points.
///
/// Only accurate for spans up to a few hundred kilometers at moderate latitudes,
/// which is all that consecutive GPS fixes ever need. This is not a great-circle
/// formula.
#[inline]
pub fn distance(p1: &TrackPoint, p2: &TrackPoint) -> f64 {
    distance_lonlat(p1.lon, p1.lat, p2.lon, p2.lat)
}

/// Same as [`distance`], on raw degree coordinates
#[inline]
pub fn distance_lonlat(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1) = (lon1.to_radians(), lat1.to_radians());
    let (lon2, lat2) = (lon2.to_radians(), lat2.to_radians());

    let a = (lon2 - lon1) * ((lat1 + lat2) / 2.0).cos();
    let b = lat2 - lat1;

    (a * a + b * b).sqrt() * EARTH_RADIUS_M
}
