use clap::Parser;
use std::path::PathBuf;
use track_visualizer_lib::ProjectionConfig;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Visualizer - Render GPS tracks listed in a manifest into a single bitmap
pub struct Settings {
    /// List of GPX tracks or directories with tracks, one path per line
    pub track_list: PathBuf,

    /// Output image (.png, .bmp or .tiff)
    pub out_image: PathBuf,

    /// Output image width in pixels
    #[clap(long, default_value = "12800")]
    pub width: u32,

    /// Output image height in pixels
    #[clap(long, default_value = "12800")]
    pub height: u32,

    /// Empty margin around the tracks in pixels
    #[clap(long, default_value = "20")]
    pub border: u32,

    /// Central meridian of the projection in degrees (default: UTM zone of the tracks)
    #[clap(long, value_name = "DEG", allow_negative_numbers = true)]
    pub central_meridian: Option<f64>,

    /// Write a JSON summary of the run to this file
    #[clap(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Settings {
    /// Parse the command line, exiting with usage help on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            width: self.width,
            height: self.height,
            border: self.border,
            central_meridian: self.central_meridian,
        }
    }
}
