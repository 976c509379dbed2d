//! Track Visualizer - Render GPS tracks into a single indexed-color bitmap
//!
//! Usage: `track-visualizer <TRACK_LIST> <OUT_IMAGE> [--width N] [--height N] [--border N]`

mod error;
mod logging;
mod manifest;
mod run;
mod settings;

use settings::Settings;

fn main() {
    logging::setup_logging();

    let settings = Settings::from_cli();
    tracing::debug!("{settings:?}");

    if let Err(e) = run::run(&settings) {
        e.exit();
    }
}
