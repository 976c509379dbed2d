//! Track source loading
//!
//! A source is either a single GPX file or a directory of them. Each file is
//! parsed into an ordered run of [`TrackPoint`]s where the first and last point
//! of every segment is flagged `terminal`, and the in-segment distance is summed
//! along the way.

use crate::{DataError, Result, TrackPoint, distance};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use xml::reader::{EventReader, XmlEvent};

/// Expected local name of the GPX document root
const GPX_ROOT: &str = "gpx";

/// Namespaces of the GPX 1.1 and 1.0 schemas
const GPX_NAMESPACES: [&str; 2] = [
    "http://www.topografix.com/GPX/1/1",
    "http://www.topografix.com/GPX/1/0",
];

/// Per-file loading statistics
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceSummary {
    /// File the points were read from
    pub path: PathBuf,
    /// Sum of all segment lengths in meters
    pub distance_m: f64,
    /// Number of points read
    pub points: usize,
    /// Number of `<trk>` elements
    pub tracks: usize,
    /// Number of `<trkseg>` elements
    pub segments: usize,
}

impl SourceSummary {
    #[inline]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }
}

/// Points parsed from one file, ready to be appended to a collection
#[derive(Clone, Debug, Default)]
pub struct LoadedTrack {
    pub points: Vec<TrackPoint>,
    pub summary: SourceSummary,
}

/// Expand a source path into the track files it names.
///
/// Directories yield their non-hidden regular files in lexicographic order;
/// nested directories are skipped without recursion. Anything else is returned
/// as-is and left for [`load_track_file`] to open.
pub fn expand_source(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| DataError::io(path, e))? {
        let entry = entry.map_err(|e| DataError::io(path, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            tracing::trace!("Skipping hidden entry {}", entry.path().display());
            continue;
        }

        let file_path = entry.path();
        if file_path.is_file() {
            files.push(file_path);
        } else {
            tracing::debug!("Skipping non-file entry {}", file_path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse a single GPX file
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn load_track_file(path: &Path) -> Result<LoadedTrack> {
    let bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;

    check_document_root(path, &bytes)?;

    let gpx = gpx::read(bytes.as_slice()).map_err(|source| DataError::GpxParse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut loaded = points_from_gpx(&gpx);
    loaded.summary.path = path.to_path_buf();

    tracing::info!(
        "Loaded {} ({} points, {} segments, {:.2} km)",
        path.display(),
        loaded.summary.points,
        loaded.summary.segments,
        loaded.summary.distance_km()
    );

    Ok(loaded)
}

/// Flatten every track segment of a parsed document into terminal-tagged points
pub fn points_from_gpx(gpx: &gpx::Gpx) -> LoadedTrack {
    let mut loaded = LoadedTrack::default();
    loaded.summary.tracks = gpx.tracks.len();

    for (track_index, track) in gpx.tracks.iter().enumerate() {
        for (segment_index, segment) in track.segments.iter().enumerate() {
            let (points, length) = segment_points(&segment.points);
            tracing::debug!(
                "Track {track_index} segment {segment_index}: {} points, {length:.1} m",
                points.len()
            );

            loaded.summary.segments += 1;
            loaded.summary.distance_m += length;
            loaded.points.extend(points);
        }
    }

    loaded.summary.points = loaded.points.len();
    loaded
}

/// Convert one segment's waypoints, returning the points and the segment length.
///
/// The first point is terminal and contributes no distance, the last point is
/// forced terminal. An empty segment yields nothing.
pub fn segment_points(waypoints: &[gpx::Waypoint]) -> (Vec<TrackPoint>, f64) {
    let mut points = Vec::with_capacity(waypoints.len());
    let mut length = 0.0;
    let mut previous: Option<TrackPoint> = None;

    for waypoint in waypoints {
        let mut point = TrackPoint::from(waypoint);
        match previous {
            Some(prev) => length += distance::distance(&prev, &point),
            None => point.terminal = true,
        }
        points.push(point);
        previous = Some(point);
    }

    if let Some(last) = points.last_mut() {
        last.terminal = true;
    }

    (points, length)
}

/// Make sure the document is well-formed up to its root and that the root is
/// `<gpx>` in one of the GPX namespaces
fn check_document_root(path: &Path, bytes: &[u8]) -> Result<()> {
    for event in EventReader::new(bytes) {
        match event {
            Ok(XmlEvent::StartElement { name, .. }) => {
                let namespace = name.namespace.as_deref();
                if name.local_name == GPX_ROOT
                    && namespace.is_some_and(|ns| GPX_NAMESPACES.contains(&ns))
                {
                    return Ok(());
                }
                let root = match namespace {
                    Some(ns) => format!("{{{ns}}}{}", name.local_name),
                    None => name.local_name,
                };
                return Err(DataError::WrongDocumentType {
                    path: path.to_path_buf(),
                    root,
                });
            }
            Ok(_) => continue,
            Err(source) => {
                return Err(DataError::XmlParse {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    Err(DataError::WrongDocumentType {
        path: path.to_path_buf(),
        root: String::new(),
    })
}
