// Save-as-file collaborator for exported reports
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Store `bytes` under `filename` and return where they ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError>;
}
