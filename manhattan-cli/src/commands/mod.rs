//! Command implementations for the manhattan CLI
//!
//! Every command reads JSON records, runs one core operation and writes JSON
//! to stdout or `--output`.

pub mod chromosomes;
pub mod labels;
pub mod locate;
pub mod nearest;
pub mod project;

use crate::error::{CliError, CliResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a JSON document from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))
}

/// Pretty-print `value` as JSON to `output`, or stdout when `None`
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> CliResult<()> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("JSON serialization error: {}", e)))?;
    match output {
        Some(path) => {
            std::fs::write(path, content + "\n")?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use manhattan_core::SignificantHit;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_json_missing_file() {
        let err = read_json::<Vec<SignificantHit>>(Path::new("/nonexistent/hits.json")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_json_reports_parse_errors() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[{\"contig\": \"1\"}]").unwrap();
        let err = read_json::<Vec<SignificantHit>>(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }

    #[test]
    fn test_write_then_read() {
        let file = NamedTempFile::new().unwrap();
        let hits = vec![SignificantHit::new("chr1", 100, 1e-9)];
        write_json(&hits, Some(file.path())).unwrap();
        let back: Vec<SignificantHit> = read_json(file.path()).unwrap();
        assert_eq!(back, hits);
    }
}
