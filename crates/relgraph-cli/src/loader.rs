//! Input loading: metadata snapshots and configuration overlays.

use relgraph_core::{Configuration, Metadata, MetadataSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid JSON for the expected document.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output serialization failed.
    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),

    /// The resolution engine rejected its input.
    #[error(transparent)]
    Core(#[from] relgraph_core::Error),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a metadata snapshot.
pub fn load_metadata(path: &Path) -> Result<Metadata, CliError> {
    let snapshot: MetadataSnapshot = read_json(path)?;
    debug!(path = %path.display(), tables = snapshot.tables.len(), "Loaded metadata snapshot");
    Ok(Metadata::from_snapshot(snapshot)?)
}

/// Load a configuration overlay, or the defaults when no path is given.
pub fn load_configuration(path: Option<&Path>) -> Result<Configuration, CliError> {
    match path {
        Some(path) => {
            let config: Configuration = read_json(path)?;
            debug!(path = %path.display(), entities = config.entities.len(), "Loaded configuration");
            Ok(config)
        }
        None => Ok(Configuration::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_metadata() {
        let file = write_temp(
            r#"{
                "tables": [
                    {
                        "name": "CUSTOMER",
                        "columns": [{ "name": "id", "jdbc_type": "INTEGER" }],
                        "primary_keys": ["id"]
                    }
                ]
            }"#,
        );
        let metadata = load_metadata(file.path()).unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.tables()[0].name, "CUSTOMER");
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let file = write_temp("{ not json");
        let err = load_metadata(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = load_configuration(Some(Path::new("/nonexistent/relgraph.json"))).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_default_configuration() {
        let config = load_configuration(None).unwrap();
        assert_eq!(config, Configuration::new());
    }

    #[test]
    fn test_load_configuration() {
        let file = write_temp(
            r#"{
                "conventions": { "account_detection": true },
                "entities": [{ "table_name": "CUSTOMER", "entity_name": "Client" }]
            }"#,
        );
        let config = load_configuration(Some(file.path())).unwrap();
        assert!(config.conventions.account_detection);
        assert_eq!(config.entities[0].entity_name.as_deref(), Some("Client"));
    }
}
