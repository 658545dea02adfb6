// Report sink that writes documents into a local directory
use crate::application::report_sink::{ReportSink, SinkError};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DirectoryReportSink {
    dir: PathBuf,
}

impl DirectoryReportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ReportSink for DirectoryReportSink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::Io {
                path: self.dir.clone(),
                source,
            })?;

        // Final component only; reports never land outside `dir`.
        let name = std::path::Path::new(filename)
            .file_name()
            .map(|n| n.to_owned())
            .unwrap_or_else(|| "report.bin".into());
        let path = self.dir.join(name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
