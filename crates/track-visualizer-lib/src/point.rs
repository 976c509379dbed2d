//! Track point record, filled in two phases (parse, then project)

#[cfg(feature = "serde")]
use serde::Serialize;

/// Integer raster coordinates, row 0 at the top
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One recorded GPS fix
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TrackPoint {
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// First or last point of its segment
    pub terminal: bool,
    /// Raster position, set by the projector
    pub pixel: Option<Pixel>,
}

impl TrackPoint {
    /// Create an interior, not yet projected point
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            terminal: false,
            pixel: None,
        }
    }

    /// Create a segment endpoint
    pub fn terminal(lon: f64, lat: f64) -> Self {
        Self {
            terminal: true,
            ..Self::new(lon, lat)
        }
    }
}

impl From<&gpx::Waypoint> for TrackPoint {
    fn from(waypoint: &gpx::Waypoint) -> Self {
        let point = waypoint.point();
        Self::new(point.x(), point.y())
    }
}
