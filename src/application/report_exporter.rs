// Report exporter - Use case for downloading a diagnostic report
use crate::application::diagnostic_backend::{BackendError, DiagnosticBackend, ReportRequest};
use crate::application::report_sink::{ReportSink, SinkError};
use crate::domain::prediction::PredictionResult;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no diagnostic result to export")]
    NoResult,
    #[error("report request failed: {0}")]
    Backend(#[from] BackendError),
    #[error("could not save report: {0}")]
    Save(#[from] SinkError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedReport {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Clone)]
pub struct ReportExporter {
    backend: Arc<dyn DiagnosticBackend>,
    sink: Arc<dyn ReportSink>,
    sample_rate_hz: f64,
    file_prefix: String,
    sequence: Arc<AtomicU64>,
}

impl ReportExporter {
    pub fn new(
        backend: Arc<dyn DiagnosticBackend>,
        sink: Arc<dyn ReportSink>,
        sample_rate_hz: f64,
        file_prefix: String,
    ) -> Self {
        Self {
            backend,
            sink,
            sample_rate_hz,
            file_prefix,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn export(&self, result: Option<&PredictionResult>) -> Result<SavedReport, ExportError> {
        let result = result.ok_or(ExportError::NoResult)?;

        let request = ReportRequest {
            signal: result.signal_samples().to_vec(),
            fs: self.sample_rate_hz,
            condition: result.label().to_string(),
            confidence: result.confidence(),
        };
        tracing::debug!(
            samples = request.signal.len(),
            condition = %request.condition,
            "Requesting diagnostic report"
        );

        let document = self.backend.diagnostic_report(&request).await?;
        let token = format!(
            "{}_{}",
            chrono::Utc::now().timestamp_millis(),
            self.sequence.fetch_add(1, Ordering::Relaxed)
        );
        let filename = report_filename(&self.file_prefix, &token, document.content_type.as_deref());
        let path = self.sink.save(&filename, &document.bytes).await?;

        tracing::info!(path = %path.display(), bytes = document.bytes.len(), "Saved diagnostic report");
        Ok(SavedReport {
            filename,
            path,
            bytes: document.bytes.len(),
        })
    }
}

/// `<prefix>_<token>.<ext>`, with the extension taken from the content type.
pub fn report_filename(prefix: &str, token: &str, content_type: Option<&str>) -> String {
    format!("{}_{}.{}", prefix, token, extension_for(content_type))
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "application/pdf" => "pdf",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/msword" => "doc",
        "text/html" => "html",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::diagnostic_backend::{PredictionPayload, ReportDocument};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        requests: Mutex<Vec<ReportRequest>>,
    }

    #[async_trait]
    impl DiagnosticBackend for RecordingBackend {
        async fn status(&self) -> Result<String, BackendError> {
            Ok("Backend Ready".to_string())
        }

        async fn predict(&self) -> Result<PredictionPayload, BackendError> {
            unreachable!("exporter never predicts")
        }

        async fn diagnostic_report(&self, request: &ReportRequest) -> Result<ReportDocument, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ReportDocument {
                bytes: Bytes::from_static(b"%PDF-1.4"),
                content_type: Some("application/pdf".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ReportSink for MemorySink {
        async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
            self.saved.lock().unwrap().push((filename.to_string(), bytes.to_vec()));
            Ok(PathBuf::from("mem").join(filename))
        }
    }

    #[test]
    fn test_report_filename_extension() {
        assert_eq!(
            report_filename("diagnostic_report", "1760600000000_0", Some("application/pdf")),
            "diagnostic_report_1760600000000_0.pdf"
        );
        assert_eq!(
            report_filename("r", "1", Some("text/html; charset=utf-8")),
            "r_1.html"
        );
        assert_eq!(report_filename("r", "1", None), "r_1.bin");
    }

    #[tokio::test]
    async fn test_export_without_result_fails() {
        let exporter = ReportExporter::new(
            Arc::new(RecordingBackend::default()),
            Arc::new(MemorySink::default()),
            12_000.0,
            "diagnostic_report".to_string(),
        );

        let err = exporter.export(None).await.unwrap_err();
        assert!(matches!(err, ExportError::NoResult));
    }

    #[tokio::test]
    async fn test_export_sends_signal_and_saves_document() {
        let backend = Arc::new(RecordingBackend::default());
        let sink = Arc::new(MemorySink::default());
        let exporter = ReportExporter::new(
            backend.clone(),
            sink.clone(),
            12_000.0,
            "diagnostic_report".to_string(),
        );
        let result = PredictionResult::new(
            "Inner Race".to_string(),
            0.8,
            vec![0.0, 0.001],
            vec![0.4, -0.4],
            None,
        )
        .unwrap();

        let saved = exporter.export(Some(&result)).await.unwrap();

        let requests = backend.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            [ReportRequest {
                signal: vec![0.4, -0.4],
                fs: 12_000.0,
                condition: "Inner Race".to_string(),
                confidence: 0.8,
            }]
        );
        assert!(saved.filename.starts_with("diagnostic_report_"));
        assert!(saved.filename.ends_with(".pdf"));
        assert_eq!(saved.bytes, 8);
        assert_eq!(sink.saved.lock().unwrap()[0].1, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_back_to_back_exports_get_distinct_filenames() {
        let sink = Arc::new(MemorySink::default());
        let exporter = ReportExporter::new(
            Arc::new(RecordingBackend::default()),
            sink.clone(),
            12_000.0,
            "diagnostic_report".to_string(),
        );
        let result = PredictionResult::new(
            "Normal".to_string(),
            0.9,
            vec![0.0],
            vec![0.1],
            None,
        )
        .unwrap();

        let first = exporter.export(Some(&result)).await.unwrap();
        let second = exporter.clone().export(Some(&result)).await.unwrap();

        assert_ne!(first.filename, second.filename);
        assert!(first.filename.ends_with("_0.pdf"));
        assert!(second.filename.ends_with("_1.pdf"));
        assert_eq!(sink.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sink_failure_is_save_error() {
        struct FullDisk;

        #[async_trait]
        impl ReportSink for FullDisk {
            async fn save(&self, filename: &str, _bytes: &[u8]) -> Result<PathBuf, SinkError> {
                Err(SinkError::Io {
                    path: PathBuf::from(filename),
                    source: std::io::Error::other("no space left on device"),
                })
            }
        }

        let exporter = ReportExporter::new(
            Arc::new(RecordingBackend::default()),
            Arc::new(FullDisk),
            12_000.0,
            "diagnostic_report".to_string(),
        );
        let result = PredictionResult::new(
            "Fault".to_string(),
            0.7,
            vec![0.0],
            vec![0.1],
            None,
        )
        .unwrap();

        let err = exporter.export(Some(&result)).await.unwrap_err();
        assert!(matches!(err, ExportError::Save(SinkError::Io { .. })));
    }
}
