//! Utility functions for coordinate projection
//!
//! Forward ellipsoidal Transverse Mercator on WGS84, parameterised the way UTM
//! is (scale factor 0.9996 on the central meridian, 500 km false easting). No
//! false northing is applied in the southern hemisphere, so northings stay
//! continuous across the equator.

use geo::Point;

/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Scale factor on the central meridian
pub const UTM_K0: f64 = 0.9996;

/// False easting in meters
pub const UTM_FALSE_EASTING: f64 = 500_000.0;

/// Width of a UTM zone in degrees of longitude
pub const UTM_ZONE_WIDTH: f64 = 6.0;

/// First eccentricity squared
const E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Second eccentricity squared
const EP2: f64 = E2 / (1.0 - E2);

/// UTM zone number (1..=60) containing the given longitude
#[inline]
pub fn utm_zone(lon: f64) -> u8 {
    let lon = normalize_longitude(lon);
    let zone = ((lon + 180.0) / UTM_ZONE_WIDTH).floor() as i32 + 1;
    zone.clamp(1, 60) as u8
}

/// Central meridian of a UTM zone in degrees
#[inline]
pub fn zone_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * UTM_ZONE_WIDTH - 183.0
}

/// Wrap a longitude into [-180, 180)
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Middle of the longitude range covered by `lons`, in [-180, 180).
///
/// A range wider than half the globe is retried with western longitudes
/// shifted by +360, so a track crossing the antimeridian is centered near
/// ±180 instead of near 0. The narrower of the two ranges wins.
pub fn center_longitude(lons: impl Iterator<Item = f64> + Clone) -> Option<f64> {
    fn range(lons: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        lons.fold(None, |acc, lon| match acc {
            None => Some((lon, lon)),
            Some((min, max)) => Some((f64::min(min, lon), f64::max(max, lon))),
        })
    }

    let (min, max) = range(lons.clone())?;
    if max - min <= 180.0 {
        return Some(normalize_longitude((min + max) / 2.0));
    }

    let (shifted_min, shifted_max) =
        range(lons.map(|lon| if lon < 0.0 { lon + 360.0 } else { lon }))?;
    let center = if shifted_max - shifted_min < max - min {
        (shifted_min + shifted_max) / 2.0
    } else {
        (min + max) / 2.0
    };
    Some(normalize_longitude(center))
}

/// Length of the meridian arc from the equator to `phi` (radians), in meters
fn meridian_arc(phi: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;

    WGS84_A
        * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Project WGS84 (lon, lat) in degrees to Transverse Mercator (easting, northing) in meters
///
/// # Arguments
/// * `lon` - Longitude in degrees (x input)
/// * `lat` - Latitude in degrees (y input)
/// * `central_meridian` - Longitude of the projection's central meridian in degrees
///
/// # Returns
/// A `Point<f64>` with x (easting) and y (northing) in meters
#[inline]
pub fn wgs84_to_transverse_mercator(lon: f64, lat: f64, central_meridian: f64) -> Point<f64> {
    let phi = lat.to_radians();
    let d_lambda = normalize_longitude(lon - central_meridian).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = WGS84_A / (1.0 - E2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = EP2 * cos_phi * cos_phi;
    let a = cos_phi * d_lambda;
    let m = meridian_arc(phi);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = UTM_K0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * EP2) * a5 / 120.0);

    let y = UTM_K0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * EP2) * a6 / 720.0));

    Point::new(x + UTM_FALSE_EASTING, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_zone() {
        assert_eq!(utm_zone(-180.0), 1);
        assert_eq!(utm_zone(-177.5), 1);
        assert_eq!(utm_zone(0.5), 31);
        assert_eq!(utm_zone(37.6), 37);
        assert_eq!(utm_zone(179.9), 60);
        assert_eq!(utm_zone(180.0), 1);
    }

    #[test]
    fn test_zone_central_meridian() {
        assert_eq!(zone_central_meridian(1), -177.0);
        assert_eq!(zone_central_meridian(31), 3.0);
        assert_eq!(zone_central_meridian(37), 39.0);
        assert_eq!(zone_central_meridian(60), 177.0);
    }

    #[test]
    fn test_center_longitude() {
        assert_eq!(center_longitude(std::iter::empty()), None);
        let center = center_longitude([37.5, 37.7, 37.6].into_iter()).unwrap();
        assert!((center - 37.6).abs() < 1e-9);
        let center = center_longitude([-10.0, 10.0].into_iter()).unwrap();
        assert!(center.abs() < 1e-9);
    }

    #[test]
    fn test_center_longitude_across_antimeridian() {
        let center = center_longitude([179.9, -179.9, -179.8].into_iter()).unwrap();
        assert!((center + 179.95).abs() < 1e-6, "center {center}");
        assert_eq!(utm_zone(center), 1);
    }

    #[test]
    fn test_origin_on_central_meridian() {
        let point = wgs84_to_transverse_mercator(3.0, 0.0, 3.0);
        assert!((point.x() - UTM_FALSE_EASTING).abs() < 1e-6);
        assert!(point.y().abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_along_meridian() {
        // Meridian arc for one degree at the equator is about 110574 m
        let point = wgs84_to_transverse_mercator(3.0, 1.0, 3.0);
        let expected = 110_574.4 * UTM_K0;
        assert!((point.y() - expected).abs() < 5.0);
        assert!((point.x() - UTM_FALSE_EASTING).abs() < 1e-6);
    }

    #[test]
    fn test_known_utm_coordinate() {
        // Moscow, Red Square in zone 37U
        let point = wgs84_to_transverse_mercator(37.6205, 55.7539, 39.0);
        assert!((point.x() - 413_420.7).abs() < 1.0);
        assert!((point.y() - 6_179_551.5).abs() < 1.0);
    }

    #[test]
    fn test_east_is_positive_x_north_is_positive_y() {
        let center = wgs84_to_transverse_mercator(39.0, 55.0, 39.0);
        let east = wgs84_to_transverse_mercator(39.1, 55.0, 39.0);
        let north = wgs84_to_transverse_mercator(39.0, 55.1, 39.0);
        assert!(east.x() > center.x());
        assert!(north.y() > center.y());
    }

    #[test]
    fn test_symmetric_about_central_meridian() {
        let west = wgs84_to_transverse_mercator(38.0, 50.0, 39.0);
        let east = wgs84_to_transverse_mercator(40.0, 50.0, 39.0);
        assert!(((west.x() - UTM_FALSE_EASTING) + (east.x() - UTM_FALSE_EASTING)).abs() < 1e-6);
        assert!((west.y() - east.y()).abs() < 1e-6);
    }
}
