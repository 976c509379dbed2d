//! Indexed-color raster with clipped line drawing and file output

use crate::{DataError, Result};
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Palette entries as RGB triplets, indexed by [`PaletteIndex`]
pub const PALETTE: [[u8; 3]; 3] = [
    [0, 0, 0],   // background
    [0, 255, 0], // track
    [255, 0, 0], // marker
];

/// Color slots of the 3-entry palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PaletteIndex {
    Background = 0,
    Track = 1,
    Marker = 2,
}

impl PaletteIndex {
    #[inline]
    pub fn rgb(self) -> [u8; 3] {
        PALETTE[self as usize]
    }
}

/// A bitmap whose pixels hold palette indices rather than colors
#[derive(Clone)]
pub struct IndexedRaster {
    pixels: GrayImage,
}

impl std::fmt::Debug for IndexedRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedRaster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl IndexedRaster {
    /// Create a raster filled with the background color
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::from_pixel(width, height, Luma([PaletteIndex::Background as u8])),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Palette index at (x, y), `None` outside the raster
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<PaletteIndex> {
        if !self.contains(x, y) {
            return None;
        }
        Some(match self.pixels.get_pixel(x as u32, y as u32).0[0] {
            1 => PaletteIndex::Track,
            2 => PaletteIndex::Marker,
            _ => PaletteIndex::Background,
        })
    }

    /// Number of pixels painted with `color`
    pub fn count(&self, color: PaletteIndex) -> usize {
        self.pixels
            .as_raw()
            .iter()
            .filter(|&&index| index == color as u8)
            .count()
    }

    /// Set one pixel, ignoring coordinates outside the raster
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: PaletteIndex) {
        if self.contains(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, Luma([color as u8]));
        }
    }

    /// Bresenham line including both endpoints, clipped to the raster
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: PaletteIndex) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Small plus sign: one pixel out from the center in each direction
    pub fn draw_cross(&mut self, x: i32, y: i32, color: PaletteIndex) {
        self.draw_line(x - 1, y, x + 1, y, color);
        self.draw_line(x, y - 1, x, y + 1, color);
    }

    /// Expand palette indices to RGB
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let index = self.pixels.get_pixel(x, y).0[0] as usize;
            Rgb(PALETTE.get(index).copied().unwrap_or(PALETTE[0]))
        })
    }

    /// Write the raster, choosing the format from the file extension.
    ///
    /// PNG is written as 8-bit indexed color with the 3-entry palette; BMP and
    /// TIFF are written as RGB.
    pub fn save(&self, path: &Path) -> Result<()> {
        let unsupported = || DataError::UnsupportedFormat {
            path: path.to_path_buf(),
        };
        let format = ImageFormat::from_path(path).map_err(|_| unsupported())?;

        match format {
            ImageFormat::Png => self.save_indexed_png(path),
            ImageFormat::Bmp | ImageFormat::Tiff => {
                self.to_rgb().save_with_format(path, format)?;
                Ok(())
            }
            _ => Err(unsupported()),
        }
    }

    fn save_indexed_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width(), self.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(PALETTE.concat());

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.pixels.as_raw())?;
        writer.finish()?;

        tracing::debug!(
            "Wrote {}x{} indexed PNG to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}
