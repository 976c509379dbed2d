//! Pipeline orchestration: manifest, load, project, render

use crate::error::CliError;
use crate::manifest;
use crate::settings::Settings;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use track_visualizer_lib::{
    CollectionInfo, Projection, ProjectionConfig, Projector, Renderer, SourceSummary,
    TrackCollection,
};

/// Summary of a completed run, optionally written as JSON
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub output: PathBuf,
    pub config: ProjectionConfig,
    pub collection: CollectionInfo,
    pub sources: Vec<SourceSummary>,
    pub projection: Projection,
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn run(settings: &Settings) -> Result<RunReport, CliError> {
    let sources = manifest::read_manifest(&settings.track_list)?;
    tracing::info!("{} sources listed in {}", sources.len(), settings.track_list.display());

    let mut collection = TrackCollection::new();
    for source in &sources {
        collection
            .load_source(source, |summary| {
                println!(
                    "Processing {} [{:.2} km]",
                    summary.path.display(),
                    summary.distance_km()
                );
            })
            .map_err(CliError::Load)?;
    }

    println!("Total: {:.2} km", collection.total_distance() / 1000.0);

    let config = settings.projection_config();
    let projection = Projector::new(config.clone())
        .project(collection.points_mut())
        .map_err(CliError::Project)?;
    if let Some((min, max)) = collection.pixel_bounds() {
        tracing::debug!(
            "Track pixels span ({}, {})..=({}, {})",
            min.x,
            min.y,
            max.x,
            max.y
        );
    }

    println!("Creating image...");
    let raster = Renderer::new(config.width, config.height)
        .render(collection.points())
        .map_err(CliError::Render)?;
    raster.save(&settings.out_image).map_err(CliError::Render)?;
    tracing::info!("Wrote {}", settings.out_image.display());

    let report = RunReport {
        output: settings.out_image.clone(),
        config,
        collection: collection.info(),
        sources: collection.sources().to_vec(),
        projection,
    };

    if let Some(path) = &settings.report {
        write_report(path, &report).map_err(|source| CliError::Report {
            path: path.clone(),
            source,
        })?;
    }

    Ok(report)
}

fn write_report(path: &Path, report: &RunReport) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
