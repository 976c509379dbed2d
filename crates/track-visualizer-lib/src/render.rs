//! Track renderer
//!
//! Consecutive points are joined with track-colored lines unless both are
//! terminal, which is what separates one segment from the next in the flat
//! point sequence. Every terminal point then gets a marker cross on top.

use crate::{DataError, IndexedRaster, PaletteIndex, Pixel, Result, TrackPoint};

/// Paints projected points into an [`IndexedRaster`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    width: u32,
    height: u32,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw all points. Every point must carry pixel coordinates.
    pub fn render(&self, points: &[TrackPoint]) -> Result<IndexedRaster> {
        if points.is_empty() {
            return Err(DataError::EmptyInput);
        }
        let pixels: Vec<Pixel> = points
            .iter()
            .map(|p| p.pixel.ok_or(DataError::NotProjected))
            .collect::<Result<_>>()?;

        let mut raster = IndexedRaster::new(self.width, self.height);

        let mut lines = 0usize;
        for (pair, px) in points.windows(2).zip(pixels.windows(2)) {
            if pair[0].terminal && pair[1].terminal {
                continue;
            }
            raster.draw_line(px[0].x, px[0].y, px[1].x, px[1].y, PaletteIndex::Track);
            lines += 1;
        }

        let mut markers = 0usize;
        for (point, px) in points.iter().zip(&pixels) {
            if point.terminal {
                raster.draw_cross(px.x, px.y, PaletteIndex::Marker);
                markers += 1;
            }
        }

        tracing::debug!("Rendered {lines} lines and {markers} markers");
        Ok(raster)
    }
}
