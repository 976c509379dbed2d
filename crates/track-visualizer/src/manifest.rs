//! Track list parsing

use crate::error::CliError;
use std::fs;
use std::path::{Path, PathBuf};

/// Read the track list file and return the sources it names, in order
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_manifest(&contents))
}

/// One source per line. Trailing whitespace is stripped; blank lines and
/// `#` comments are skipped.
pub fn parse_manifest(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let entry = line.trim_end();
            if entry.trim_start().is_empty() || entry.trim_start().starts_with('#') {
                tracing::debug!("Skipping manifest line {}", index + 1);
                return None;
            }
            Some(PathBuf::from(entry))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let contents = "tracks/2019\n\n   \n# old phone\nrides/commute.gpx  \r\nlast.gpx";
        assert_eq!(
            parse_manifest(contents),
            vec![
                PathBuf::from("tracks/2019"),
                PathBuf::from("rides/commute.gpx"),
                PathBuf::from("last.gpx"),
            ]
        );
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_manifest(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(CliError::Manifest { .. })));
    }
}
