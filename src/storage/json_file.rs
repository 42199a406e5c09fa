use super::review::Review;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} does not hold a JSON array")]
    NotArray { path: PathBuf },
    #[error("Review #{index} in {path} cannot be decoded: {source}")]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-collection JSON file storage.
///
/// Every call touches the entire file: reads parse the full array, writes
/// replace it. There is no locking, so two concurrent read-modify-write
/// cycles race and the last `write_all` wins.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty `[]` file if missing
    pub async fn ensure_file(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }

        if !fs::try_exists(&self.path).await.map_err(|e| self.io_err(e))? {
            debug!(path = %self.path.display(), "Creating empty review file");
            fs::write(&self.path, "[]").await.map_err(|e| self.io_err(e))?;
        }

        Ok(())
    }

    /// Read the collection, surfacing I/O and parse failures.
    ///
    /// Records are coerced one at a time; any record that still cannot be
    /// decoded fails the whole read so callers never persist a partial view.
    pub async fn try_read_all(&self) -> Result<Vec<Review>, StorageError> {
        let mut reviews = Vec::new();
        for (index, value) in self.read_records().await?.into_iter().enumerate() {
            let review = Review::from_stored(value).map_err(|source| StorageError::Record {
                path: self.path.clone(),
                index,
                source,
            })?;
            reviews.push(review);
        }
        Ok(reviews)
    }

    /// Read the collection, falling back to an empty one on any failure.
    ///
    /// Undecodable records are skipped. Failures are logged so a corrupt file
    /// does not go unnoticed.
    pub async fn read_all(&self) -> Vec<Review> {
        let records = match self.read_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to read reviews, using empty collection");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match Review::from_stored(value) {
                Ok(review) => Some(review),
                Err(e) => {
                    warn!(path = %self.path.display(), index, error = %e, "Skipping undecodable review");
                    None
                }
            })
            .collect()
    }

    async fn read_records(&self) -> Result<Vec<Value>, StorageError> {
        self.ensure_file().await?;

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_err(e))?;

        match serde_json::from_str::<Value>(&content).map_err(|e| self.json_err(e))? {
            Value::Array(records) => Ok(records),
            _ => Err(StorageError::NotArray {
                path: self.path.clone(),
            }),
        }
    }

    /// Replace the file contents with the full collection
    pub async fn write_all(&self, reviews: &[Review]) -> Result<(), StorageError> {
        self.ensure_file().await?;

        let content = serde_json::to_string_pretty(reviews).map_err(|e| self.json_err(e))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| self.io_err(e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(self.io_err(e));
        }

        debug!(count = reviews.len(), "Wrote review collection");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        self.path.with_file_name(name)
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_err(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}
