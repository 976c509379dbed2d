//! Track Visualizer Library - Core pipeline for rendering GPX track collections
//!
//! This library loads GPX tracks, accumulates their travelled distance, projects
//! every recorded fix onto a planar raster and paints the result into a small
//! indexed-color bitmap. Segment endpoints ("terminal" points) are tracked so that
//! consecutive segments are never joined by a spurious connector.
//!
//! # Architecture
//!
//! - **[`distance`]**: Equirectangular flat-earth distance for short spans
//! - **[`loader`]**: Source expansion and GPX parsing into [`TrackPoint`]s
//! - **[`TrackCollection`]**: Ordered points of every loaded source plus totals
//! - **[`Projector`]**: UTM-like projection and aspect-preserving fit to the raster
//! - **[`Renderer`]**: Line and marker drawing into an [`IndexedRaster`]
//!
//! # Pipeline
//!
//! ```no_run
//! use track_visualizer_lib::{ProjectionConfig, Projector, Renderer, TrackCollection};
//!
//! # fn main() -> track_visualizer_lib::Result<()> {
//! let mut collection = TrackCollection::new();
//! collection.load_source("tracks/".as_ref(), |summary| {
//!     println!("Processing {} [{:.2} km]", summary.path.display(), summary.distance_km());
//! })?;
//!
//! let config = ProjectionConfig::default();
//! Projector::new(config.clone()).project(collection.points_mut())?;
//!
//! let raster = Renderer::new(config.width, config.height).render(collection.points())?;
//! raster.save("out.png".as_ref())?;
//! # Ok(())
//! # }
//! ```

mod collection;
pub mod distance;
pub mod loader;
mod point;
mod projector;
mod raster;
mod render;
pub mod utils;

use std::path::PathBuf;

// Public API exports
pub use collection::{CollectionInfo, TrackCollection};
pub use loader::{LoadedTrack, SourceSummary};
pub use point::{Pixel, TrackPoint};
pub use projector::{Axis, Projection, ProjectionConfig, Projector};
pub use raster::{IndexedRaster, PALETTE, PaletteIndex};
pub use render::Renderer;

/// Error types for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("{}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: XML parsing error: {source}", path.display())]
    XmlParse {
        path: PathBuf,
        #[source]
        source: xml::reader::Error,
    },

    #[error("{}: GPX parsing error: {source}", path.display())]
    GpxParse {
        path: PathBuf,
        #[source]
        source: gpx::errors::GpxError,
    },

    #[error("{}: XML document of the wrong type, root node != gpx (found <{root}>)", path.display())]
    WrongDocumentType { path: PathBuf, root: String },

    #[error("No track points were loaded")]
    EmptyInput,

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Raster {width}x{height} leaves no room inside a {border} px border")]
    InvalidRaster { width: u32, height: u32, border: u32 },

    #[error("Track points must be projected before rendering")]
    NotProjected,

    #[error("{}: unsupported output format, expected .png, .bmp or .tiff", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl DataError {
    /// Wrap an I/O error on an input, distinguishing missing inputs from other failures
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::InputNotFound { path, source }
        } else {
            DataError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
