//! Append-only log of catalog responses that could not be processed.
//!
//! Bodies can be large, so they go to a side file instead of the console.
//! Each entry is a local timestamp, a heading naming the URL, the raw body
//! and a blank line. Bodies that parsed but could not be flattened also get
//! the reason in the heading.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use upcsync_catalog::CatalogError;

pub(crate) struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an entry for a malformed response. Write failures are logged
    /// and swallowed; losing an entry must not stop the sync.
    pub(crate) async fn record_malformed(&self, url: &str, error: &CatalogError, body: &str) {
        let entry = format_entry(Local::now(), url, error, body);
        if let Err(err) = self.append(&entry).await {
            tracing::error!(
                path = %self.path.display(),
                url,
                error = %err,
                "failed to write error log entry"
            );
        }
    }

    async fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}

fn format_entry(at: DateTime<Local>, url: &str, error: &CatalogError, body: &str) -> String {
    let heading = match error {
        CatalogError::Malformed { .. } => format!("Invalid JSON response for: {url}"),
        other => format!("Unusable catalog response for: {url}: {other}"),
    };
    format!("{}\n{heading}\n{body}\n\n", at.format("%a %b %e %H:%M:%S %Y"))
}
