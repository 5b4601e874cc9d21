//! Template and data file loading.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to read a template or a data context from storage
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read data file {}: {source}", .path.display())]
    Data {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a template file as UTF-8 text
pub async fn load_template(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Template {
            path: path.to_path_buf(),
            source,
        })
}

/// Read and deserialize a JSON data file
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Data {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        tokio::fs::write(&path, r#"{"invoices": []}"#).await.unwrap();

        let value: Value = load_json(&path).await.unwrap();
        assert!(value["invoices"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_json_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result: Result<Value, _> = load_json(&path).await;
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_load_missing_files() {
        let missing = Path::new("/definitely/not/here.rtf");
        assert!(matches!(
            load_template(missing).await,
            Err(LoadError::Template { .. })
        ));

        let result: Result<Value, _> = load_json(missing).await;
        assert!(matches!(result, Err(LoadError::Data { .. })));
    }
}
