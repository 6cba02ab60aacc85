//! Best-effort request logging to a JSON file.
//!
//! Each logged API call appends one entry. The log is a single JSON
//! array rewritten in full on every append; two concurrent appends can
//! interleave their read-append-write cycles and lose an entry. That
//! lost-update window is an accepted property of this log, which exists
//! for operator inspection, not audit.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One logged API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 timestamp of the call.
    pub timestamp: String,
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request body, for routes that log one.
    pub request_body: Option<Value>,
}

/// Errors from reading or writing the log file.
#[derive(Debug, Error)]
pub enum LogError {
    /// Log file could not be read or written.
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),

    /// Log contents could not be serialized.
    #[error("log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only request log backed by a JSON file.
#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
}

impl RequestLog {
    /// Create a request log writing to the given path.
    ///
    /// The file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Record an API call.
    ///
    /// Failures are reported to the operator log and swallowed; they
    /// never reach the caller or affect the response.
    pub async fn record(&self, method: &str, url: &str, request_body: Option<Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            method: method.to_string(),
            url: url.to_string(),
            request_body,
        };

        if let Err(e) = self.append(entry).await {
            tracing::error!(
                error = %e,
                path = %self.path.display(),
                "Failed to write request log"
            );
        }
    }

    /// Append one entry: read the whole log, push, rewrite the whole log.
    async fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        let mut entries = self.read_all().await;
        entries.push(entry);

        let serialized = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }

    /// Read all entries. A missing or unparseable file yields an empty log.
    pub async fn read_all(&self) -> Vec<LogEntry> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_log() -> (tempfile::TempDir, RequestLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path().join("logs.json"));
        (dir, log)
    }

    #[tokio::test]
    async fn test_first_record_creates_file() {
        let (_dir, log) = temp_log();

        log.record("GET", "/api/items/", None).await;

        let entries = log.read_all().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].method, "GET");
        assert_eq!(entries[0].url, "/api/items/");
        assert!(entries[0].request_body.is_none());
    }

    #[tokio::test]
    async fn test_records_accumulate_in_order() {
        let (_dir, log) = temp_log();

        log.record("POST", "/api/items/", Some(json!({"name": "a"})))
            .await;
        log.record("DELETE", "/api/items/1/", None).await;

        let entries = log.read_all().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].method, "POST");
        assert_eq!(entries[1].method, "DELETE");
        assert_eq!(entries[0].request_body, Some(json!({"name": "a"})));
    }

    #[tokio::test]
    async fn test_timestamps_are_rfc3339() {
        let (_dir, log) = temp_log();

        log.record("GET", "/api/items/", None).await;

        let entries = log.read_all().await;
        assert!(
            chrono::DateTime::parse_from_rfc3339(&entries[0].timestamp).is_ok(),
            "timestamp {} is not RFC 3339",
            entries[0].timestamp
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let (dir, log) = temp_log();

        tokio::fs::write(dir.path().join("logs.json"), b"not json")
            .await
            .unwrap();

        log.record("GET", "/api/items/", None).await;

        let entries = log.read_all().await;
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_record_swallows_write_failure() {
        // Pointing at a directory makes the write fail; record must not panic.
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path());

        log.record("GET", "/api/items/", None).await;
    }
}
