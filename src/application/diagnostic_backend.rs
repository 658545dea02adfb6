// Backend trait for the prediction and report service
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Raw `/predict` body. Fields stay optional here; deciding what counts as a
/// malformed payload belongs to the analysis runner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionPayload {
    pub prediction: Option<String>,
    pub confidence: Option<f64>,
    pub signal: Option<Vec<f64>>,
    pub time: Option<Vec<f64>>,
    pub fft_freqs: Option<Vec<f64>>,
    pub fft_amps: Option<Vec<f64>>,
}

/// `/diagnostic-report` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub signal: Vec<f64>,
    pub fs: f64,
    pub condition: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

#[async_trait]
pub trait DiagnosticBackend: Send + Sync {
    /// `GET /` - returns the status message
    async fn status(&self) -> Result<String, BackendError>;

    /// `POST /predict` - runs one diagnosis on the backend
    async fn predict(&self) -> Result<PredictionPayload, BackendError>;

    /// `POST /diagnostic-report` - renders a downloadable document
    async fn diagnostic_report(&self, request: &ReportRequest) -> Result<ReportDocument, BackendError>;
}
