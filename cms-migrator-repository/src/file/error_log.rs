//! JSON-lines file implementation of [`ErrorLog`].

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::RepositoryError;
use crate::interfaces::ErrorLog;

/// Appends failure payloads to `<dir>/<operation>.log`, one JSON object per line.
pub struct FileErrorLog {
    dir: PathBuf,
    // Serializes appends so concurrent callers never interleave lines.
    lock: Mutex<()>,
}

impl FileErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file for an operation.
    pub fn log_path(&self, operation: &str) -> PathBuf {
        let name: String = operation
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.log", name))
    }
}

#[async_trait]
impl ErrorLog for FileErrorLog {
    async fn append(&self, operation: &str, payload: &Value) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;

        fs::create_dir_all(&self.dir).await?;
        let path = self.log_path(operation);

        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "operation": operation,
            "payload": payload,
        });
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(operation = %operation, path = %path.display(), "Appended error log entry");
        Ok(())
    }
}
