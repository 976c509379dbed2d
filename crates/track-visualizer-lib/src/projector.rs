//! Projection of track points onto the output raster
//!
//! Points are first projected with a Transverse Mercator zone picked for the
//! track's bounding box, then fitted to the raster with a single uniform scale
//! so the aspect ratio is preserved.

use crate::collection::bounds;
use crate::{DataError, Pixel, Result, TrackPoint, utils};
use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Configuration for the projector
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProjectionConfig {
    /// Output raster width in pixels
    pub width: u32,
    /// Output raster height in pixels
    pub height: u32,
    /// Empty margin kept on every side, in pixels
    pub border: u32,
    /// Fixed central meridian in degrees. When `None`, the UTM zone of the
    /// bounding box centroid is used.
    pub central_meridian: Option<f64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            width: 12800,
            height: 12800,
            border: 20,
            central_meridian: None,
        }
    }
}

/// Raster axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Axis {
    X,
    Y,
}

/// Outcome of a projection run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Projection {
    /// UTM zone number, `None` when the central meridian was given explicitly
    pub zone: Option<u8>,
    /// Central meridian used, in degrees
    pub central_meridian: f64,
    /// Planar extent as (min_x, min_y, max_x, max_y) in meters
    pub planar_bounds: (f64, f64, f64, f64),
    /// Pixels per planar meter
    pub scale: f64,
    /// Axis whose extent decided the scale
    pub limiting_axis: Axis,
}

/// Fits geographic coordinates into raster pixel space
#[derive(Debug, Clone)]
pub struct Projector {
    config: ProjectionConfig,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Projector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project every point in place, setting its pixel coordinates.
    ///
    /// Fails on an empty slice, on a raster too small for its border or wider
    /// than `i32::MAX` pixels, and when all points collapse onto a single
    /// planar position.
    pub fn project(&self, points: &mut [TrackPoint]) -> Result<Projection> {
        self.check_raster()?;

        if points.is_empty() {
            return Err(DataError::EmptyInput);
        }
        let (zone, central_meridian) = self.pick_meridian(points);
        tracing::debug!(
            "Projecting {} points with central meridian {central_meridian} (zone {zone:?})",
            points.len()
        );

        let planar: Vec<Coord<f64>> = points
            .iter()
            .map(|p| utils::wgs84_to_transverse_mercator(p.lon, p.lat, central_meridian).into())
            .collect();
        let planar_bbox = bounds(planar.iter().copied()).ok_or(DataError::EmptyInput)?;

        let (scale, limiting_axis) = self.fit_scale(&planar_bbox)?;
        let border = f64::from(self.config.border);
        let height = i64::from(self.config.height);
        let min = planar_bbox.min();

        for (point, coord) in points.iter_mut().zip(&planar) {
            let x = (border + scale * (coord.x - min.x)).round() as i64;
            let y = height - (border + scale * (coord.y - min.y)).round() as i64;
            // Within 0..=width and 0..=height, both capped at i32::MAX by check_raster
            point.pixel = Some(Pixel::new(x as i32, y as i32));
        }

        let max = planar_bbox.max();
        tracing::info!(
            "Fitted {:.0} x {:.0} m to the raster at {scale:.6} px/m ({limiting_axis:?} limited)",
            max.x - min.x,
            max.y - min.y
        );

        Ok(Projection {
            zone,
            central_meridian,
            planar_bounds: (min.x, min.y, max.x, max.y),
            scale,
            limiting_axis,
        })
    }

    fn check_raster(&self) -> Result<()> {
        let ProjectionConfig {
            width,
            height,
            border,
            ..
        } = self.config;
        let twice_border = u64::from(border) * 2;
        let max_side = i32::MAX as u32;
        if u64::from(width) <= twice_border
            || u64::from(height) <= twice_border
            || width > max_side
            || height > max_side
        {
            return Err(DataError::InvalidRaster {
                width,
                height,
                border,
            });
        }
        Ok(())
    }

    /// Explicit meridian, or the UTM zone around the middle of the longitudes
    fn pick_meridian(&self, points: &[TrackPoint]) -> (Option<u8>, f64) {
        if let Some(meridian) = self.config.central_meridian {
            return (None, meridian);
        }
        let center = utils::center_longitude(points.iter().map(|p| p.lon)).unwrap_or(0.0);
        let zone = utils::utm_zone(center);
        (Some(zone), utils::zone_central_meridian(zone))
    }

    /// Uniform scale `min(k_x, k_y)`. An axis with zero extent does not limit
    /// the scale; if both are zero the geometry is degenerate.
    fn fit_scale(&self, planar_bbox: &Rect<f64>) -> Result<(f64, Axis)> {
        let span_x = planar_bbox.width();
        let span_y = planar_bbox.height();
        if !span_x.is_finite() || !span_y.is_finite() {
            return Err(DataError::DegenerateGeometry(
                "projected coordinates are not finite".to_string(),
            ));
        }

        let usable_x = f64::from(self.config.width) - 2.0 * f64::from(self.config.border);
        let usable_y = f64::from(self.config.height) - 2.0 * f64::from(self.config.border);
        let k_x = (span_x > 0.0).then(|| usable_x / span_x);
        let k_y = (span_y > 0.0).then(|| usable_y / span_y);

        match (k_x, k_y) {
            (Some(k_x), Some(k_y)) if k_x <= k_y => Ok((k_x, Axis::X)),
            (Some(_), Some(k_y)) => Ok((k_y, Axis::Y)),
            (Some(k_x), None) => {
                tracing::warn!("All points share one northing, scaling by width only");
                Ok((k_x, Axis::X))
            }
            (None, Some(k_y)) => {
                tracing::warn!("All points share one easting, scaling by height only");
                Ok((k_y, Axis::Y))
            }
            (None, None) => Err(DataError::DegenerateGeometry(
                "all points project to the same position".to_string(),
            )),
        }
    }
}
