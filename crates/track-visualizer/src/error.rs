//! CLI error handling
//!
//! Every failure in the pipeline ends up here. The library only returns
//! errors; this is the single place that prints them and terminates.

use std::path::PathBuf;
use std::process;
use track_visualizer_lib::DataError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(DataError),

    #[error(transparent)]
    Project(DataError),

    #[error(transparent)]
    Render(DataError),

    #[error("Failed to write report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Manifest { .. } => 1,
            CliError::Load(_) => 2,
            CliError::Project(_) => 3,
            CliError::Render(_) | CliError::Report { .. } => 4,
        }
    }

    /// Exit the process with an error message and the matching code
    pub fn exit(&self) -> ! {
        tracing::debug!("Fatal error: {self:?}");
        eprintln!("Error: {self}");
        process::exit(self.exit_code())
    }
}
