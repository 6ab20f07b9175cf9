//! Local filesystem ingestion forwarder.
//!
//! Writes each batch as a JSON document for a downstream pipeline to pick
//! up. Files are written atomically (temp file, then rename) so a reader
//! never sees a partial batch. Each run writes into its own directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::ingest::{IngestBatch, IngestForwarder, IngestSummary, batches};

const DEFAULT_PLAYBOOK_DIR: &str = "default";
const RUN_DIR_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// Filesystem-backed forwarder.
#[derive(Debug, Clone)]
pub struct LocalForwarder {
    root_dir: PathBuf,
}

impl LocalForwarder {
    /// Create a forwarder writing under the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Directory for one playbook's batches.
    fn playbook_dir(&self, playbook_id: Option<&str>) -> PathBuf {
        let name = playbook_id
            .map(sanitize)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYBOOK_DIR.to_string());
        self.root_dir.join(name)
    }

    /// Create a fresh directory for one run under `parent`.
    ///
    /// Runs started within the same millisecond get a `-N` suffix.
    async fn create_run_dir(&self, parent: &Path, started: DateTime<Utc>) -> Result<PathBuf> {
        tokio::fs::create_dir_all(parent).await?;

        let stem = started.format(RUN_DIR_FORMAT).to_string();
        let mut candidate = parent.join(&stem);
        let mut attempt = 1;
        loop {
            match tokio::fs::create_dir(&candidate).await {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    candidate = parent.join(format!("{stem}-{attempt}"));
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Batch file name for a 1-based index.
    fn batch_key(index: usize) -> String {
        format!("batch-{:04}.json", index)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(path, &bytes).await
    }
}

/// Keep playbook ids usable as a single path component.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl IngestForwarder for LocalForwarder {
    async fn trigger_ingest(
        &self,
        indicators: &[String],
        playbook_id: Option<&str>,
        parent_env: &Value,
        batch_size: usize,
    ) -> Result<IngestSummary> {
        let chunks = batches(indicators, batch_size)?;
        let batch_count = chunks.len();
        let timestamp = Utc::now();
        let playbook_dir = self.playbook_dir(playbook_id);
        let dir = self
            .create_run_dir(&playbook_dir, timestamp)
            .await
            .map_err(|e| AppError::forward(playbook_dir.display().to_string(), e))?;

        for (i, chunk) in chunks.into_iter().enumerate() {
            let batch = IngestBatch {
                playbook_id: playbook_id.map(str::to_string),
                parent_env: parent_env.clone(),
                batch_index: i + 1,
                batch_count,
                created_at: timestamp,
                indicators: chunk.to_vec(),
            };
            let path = dir.join(Self::batch_key(batch.batch_index));
            self.write_json(&path, &batch)
                .await
                .map_err(|e| AppError::forward(path.display().to_string(), e))?;
            log::debug!(
                "Wrote batch {}/{} ({} indicators) to {}",
                batch.batch_index,
                batch_count,
                batch.indicators.len(),
                path.display()
            );
        }

        log::info!(
            "Forwarded {} indicators in {} batches to {}",
            indicators.len(),
            batch_count,
            dir.display()
        );

        Ok(IngestSummary {
            indicator_count: indicators.len(),
            batch_count,
            timestamp,
            location: dir.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn make_indicators(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("192.0.2.{}", i % 256)).collect()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn read_batch(path: &Path) -> IngestBatch {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_writes_one_file_per_batch() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());
        let indicators = make_indicators(2500);

        let summary = forwarder
            .trigger_ingest(&indicators, Some("pb-7"), &json!({"tenant": "a"}), 1000)
            .await
            .unwrap();

        assert_eq!(summary.indicator_count, 2500);
        assert_eq!(summary.batch_count, 3);

        let run_dir = PathBuf::from(&summary.location);
        assert_eq!(run_dir.parent(), Some(dir.path().join("pb-7").as_path()));
        assert_eq!(
            file_names(&run_dir),
            ["batch-0001.json", "batch-0002.json", "batch-0003.json"]
        );

        let batch = read_batch(&run_dir.join("batch-0003.json"));
        assert_eq!(batch.batch_index, 3);
        assert_eq!(batch.batch_count, 3);
        assert_eq!(batch.indicators.len(), 500);
        assert_eq!(batch.playbook_id.as_deref(), Some("pb-7"));
        assert_eq!(batch.parent_env["tenant"], "a");
        assert_eq!(batch.created_at, summary.timestamp);
    }

    #[tokio::test]
    async fn test_each_run_gets_its_own_directory() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());

        let first = forwarder
            .trigger_ingest(&make_indicators(2500), Some("pb"), &json!({}), 1000)
            .await
            .unwrap();
        let second = forwarder
            .trigger_ingest(&["203.0.113.9".to_string()], Some("pb"), &json!({}), 1000)
            .await
            .unwrap();

        assert_ne!(first.location, second.location);
        assert_eq!(file_names(&dir.path().join("pb")).len(), 2);

        // The first run's batches are untouched.
        let first_dir = PathBuf::from(&first.location);
        assert_eq!(file_names(&first_dir).len(), 3);
        assert_eq!(read_batch(&first_dir.join("batch-0003.json")).indicators.len(), 500);

        // The second run holds only its own single batch.
        let second_dir = PathBuf::from(&second.location);
        assert_eq!(file_names(&second_dir), ["batch-0001.json"]);
        let batch = read_batch(&second_dir.join("batch-0001.json"));
        assert_eq!(batch.batch_count, 1);
        assert_eq!(batch.indicators, ["203.0.113.9"]);
    }

    #[tokio::test]
    async fn test_same_millisecond_runs_do_not_collide() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());
        let started = Utc::now();

        let a = forwarder.create_run_dir(dir.path(), started).await.unwrap();
        let b = forwarder.create_run_dir(dir.path(), started).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(
            b.file_name().unwrap().to_string_lossy(),
            format!("{}-1", started.format(RUN_DIR_FORMAT))
        );
    }

    #[tokio::test]
    async fn test_missing_playbook_uses_default_dir() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());

        let summary = forwarder
            .trigger_ingest(&make_indicators(1), None, &Value::Null, 1000)
            .await
            .unwrap();

        let run_dir = PathBuf::from(&summary.location);
        assert_eq!(run_dir.parent(), Some(dir.path().join("default").as_path()));
        assert!(run_dir.join("batch-0001.json").exists());
    }

    #[tokio::test]
    async fn test_playbook_id_cannot_escape_root() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());

        let summary = forwarder
            .trigger_ingest(&make_indicators(1), Some("../evil"), &Value::Null, 1000)
            .await
            .unwrap();

        let run_dir = PathBuf::from(&summary.location);
        assert_eq!(run_dir.parent(), Some(dir.path().join("___evil").as_path()));
        assert!(run_dir.join("batch-0001.json").exists());
    }

    #[tokio::test]
    async fn test_zero_batch_size_fails() {
        let dir = tempdir().unwrap();
        let forwarder = LocalForwarder::new(dir.path());
        let result = forwarder
            .trigger_ingest(&make_indicators(3), None, &Value::Null, 0)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
