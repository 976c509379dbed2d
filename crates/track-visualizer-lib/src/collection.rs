//! TrackCollection - Ordered working set of every loaded point
//!
//! Sources are appended in load order. That order matters: it decides which
//! consecutive points belong to different segments and therefore must not be
//! connected when rendering.

use crate::loader::{self, LoadedTrack, SourceSummary};
use crate::{Pixel, Result, TrackPoint};
use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::path::Path;

/// Information about the track collection
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CollectionInfo {
    /// Number of files loaded
    pub source_count: usize,
    /// Total number of track points
    pub total_points: usize,
    /// Number of segment endpoints
    pub terminal_points: usize,
    /// Total distance in meters
    pub total_distance_meters: f64,
}

/// All points of all loaded sources plus the running distance total
#[derive(Debug, Clone, Default)]
pub struct TrackCollection {
    points: Vec<TrackPoint>,
    sources: Vec<SourceSummary>,
    total_distance: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the points of one parsed file, preserving their order
    pub fn append(&mut self, loaded: LoadedTrack) {
        self.total_distance += loaded.summary.distance_m;
        self.points.extend(loaded.points);
        self.sources.push(loaded.summary);
    }

    /// Load a file or a directory of files, appending each one as it is parsed.
    ///
    /// `on_loaded` is called once per file right after it was appended. Loading
    /// stops at the first error.
    pub fn load_source<F>(&mut self, path: &Path, mut on_loaded: F) -> Result<()>
    where
        F: FnMut(&SourceSummary),
    {
        for file in loader::expand_source(path)? {
            let loaded = loader::load_track_file(&file)?;
            self.append(loaded);
            if let Some(summary) = self.sources.last() {
                on_loaded(summary);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Mutable access for in-place projection. The slice length cannot change.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [TrackPoint] {
        &mut self.points
    }

    /// Per-file summaries in load order
    #[inline]
    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total distance across all loaded sources in meters
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn info(&self) -> CollectionInfo {
        CollectionInfo {
            source_count: self.sources.len(),
            total_points: self.points.len(),
            terminal_points: self.points.iter().filter(|p| p.terminal).count(),
            total_distance_meters: self.total_distance,
        }
    }

    /// Longitude/latitude extent of all points (x = lon, y = lat).
    ///
    /// Returns `None` if the collection is empty.
    pub fn geographic_bounds(&self) -> Option<Rect<f64>> {
        bounds(self.points.iter().map(|p| Coord { x: p.lon, y: p.lat }))
    }

    /// Pixel extent of all projected points as (min, max) corners.
    ///
    /// Returns `None` if nothing has been projected yet.
    pub fn pixel_bounds(&self) -> Option<(Pixel, Pixel)> {
        let mut projected = self.points.iter().filter_map(|p| p.pixel);
        let first = projected.next()?;
        Some(projected.fold((first, first), |(min, max), p| {
            (
                Pixel::new(min.x.min(p.x), min.y.min(p.y)),
                Pixel::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Min/max extent of a coordinate stream, `None` when it is empty
pub(crate) fn bounds(coords: impl IntoIterator<Item = Coord<f64>>) -> Option<Rect<f64>> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut found = false;

    for c in coords {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
        found = true;
    }

    found.then(|| {
        Rect::new(
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: max_y },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProjectionConfig, Projector, distance};
    use std::fs;

    fn loaded(path: &str, points: Vec<TrackPoint>, distance_m: f64) -> LoadedTrack {
        LoadedTrack {
            summary: SourceSummary {
                path: path.into(),
                distance_m,
                points: points.len(),
                tracks: 1,
                segments: 1,
            },
            points,
        }
    }

    fn write_gpx(dir: &Path, name: &str, coords: &[(f64, f64)]) {
        let mut body = String::new();
        for (lat, lon) in coords {
            body.push_str(&format!(r#"<trkpt lat="{lat}" lon="{lon}"></trkpt>"#));
        }
        let doc = format!(
            r#"<?xml version="1.0"?><gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1"><trk><trkseg>{body}</trkseg></trk></gpx>"#
        );
        fs::write(dir.join(name), doc).unwrap();
    }

    #[test]
    fn test_empty_collection() {
        let collection = TrackCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.total_distance(), 0.0);
        assert!(collection.geographic_bounds().is_none());
        assert!(collection.pixel_bounds().is_none());
    }

    #[test]
    fn test_append_preserves_order_and_totals() {
        let mut collection = TrackCollection::new();
        collection.append(loaded(
            "a.gpx",
            vec![TrackPoint::terminal(1.0, 1.0), TrackPoint::terminal(2.0, 2.0)],
            100.0,
        ));
        collection.append(loaded("b.gpx", vec![TrackPoint::terminal(3.0, 3.0)], 50.0));

        let lons: Vec<f64> = collection.points().iter().map(|p| p.lon).collect();
        assert_eq!(lons, vec![1.0, 2.0, 3.0]);
        assert_eq!(collection.total_distance(), 150.0);

        let info = collection.info();
        assert_eq!(info.source_count, 2);
        assert_eq!(info.total_points, 3);
        assert_eq!(info.terminal_points, 3);
    }

    #[test]
    fn test_geographic_bounds() {
        let mut collection = TrackCollection::new();
        collection.append(loaded(
            "a.gpx",
            vec![TrackPoint::new(37.5, 55.9), TrackPoint::new(37.7, 55.6)],
            0.0,
        ));

        let bbox = collection.geographic_bounds().unwrap();
        assert_eq!(bbox.min(), Coord { x: 37.5, y: 55.6 });
        assert_eq!(bbox.max(), Coord { x: 37.7, y: 55.9 });
    }

    #[test]
    fn test_pixel_bounds_after_projection() {
        let mut collection = TrackCollection::new();
        collection.append(loaded(
            "a.gpx",
            vec![
                TrackPoint::terminal(37.50, 55.60),
                TrackPoint::new(37.60, 55.65),
                TrackPoint::terminal(37.70, 55.62),
            ],
            0.0,
        ));
        assert!(collection.pixel_bounds().is_none());

        let config = ProjectionConfig {
            width: 200,
            height: 200,
            border: 10,
            central_meridian: None,
        };
        Projector::new(config).project(collection.points_mut()).unwrap();

        // About 12.6 km wide and 5.6 km tall, so the width limits the scale
        let (min, max) = collection.pixel_bounds().unwrap();
        assert_eq!((min.x, max.x), (10, 190));
        assert_eq!(max.y, 190);
        assert!(min.y > 90 && min.y < 130, "{min:?}");
    }

    #[test]
    fn test_load_directory_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_gpx(dir.path(), "2.gpx", &[(55.80, 37.60), (55.81, 37.60)]);
        write_gpx(dir.path(), "1.gpx", &[(55.70, 37.60), (55.71, 37.60), (55.72, 37.60)]);
        write_gpx(dir.path(), ".ignored.gpx", &[(10.0, 10.0), (11.0, 11.0)]);

        let mut collection = TrackCollection::new();
        let mut seen = Vec::new();
        collection
            .load_source(dir.path(), |summary| seen.push(summary.path.clone()))
            .unwrap();

        assert_eq!(seen, vec![dir.path().join("1.gpx"), dir.path().join("2.gpx")]);
        assert_eq!(collection.len(), 5);
        assert_eq!(collection.points()[0].lat, 55.70);

        let expected = distance::distance_lonlat(37.60, 55.70, 37.60, 55.71)
            + distance::distance_lonlat(37.60, 55.71, 37.60, 55.72)
            + distance::distance_lonlat(37.60, 55.80, 37.60, 55.81);
        assert!((collection.total_distance() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_load_stops_at_first_error() {
        let dir = tempfile::tempdir().unwrap();
        write_gpx(dir.path(), "a.gpx", &[(55.70, 37.60), (55.71, 37.60)]);
        fs::write(dir.path().join("b.gpx"), "<kml></kml>").unwrap();
        write_gpx(dir.path(), "c.gpx", &[(55.80, 37.60), (55.81, 37.60)]);

        let mut collection = TrackCollection::new();
        let mut calls = 0;
        let result = collection.load_source(dir.path(), |_| calls += 1);

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert_eq!(collection.sources().len(), 1);
    }
}
