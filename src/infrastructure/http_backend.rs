// HTTP implementation of the diagnostic backend
use crate::application::diagnostic_backend::{
    BackendError, DiagnosticBackend, PredictionPayload, ReportDocument, ReportRequest,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const STATUS_PATH: &str = "/";
const PREDICT_PATH: &str = "/predict";
const REPORT_PATH: &str = "/diagnostic-report";

#[derive(Debug, Clone)]
pub struct HttpDiagnosticBackend {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    message: String,
}

impl HttpDiagnosticBackend {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        tracing::debug!("Sending request to {}", self.url(path));
        let response = request.send().await.map_err(|source| BackendError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, BackendError> {
        let body = response.bytes().await.map_err(|source| BackendError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|e| BackendError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DiagnosticBackend for HttpDiagnosticBackend {
    async fn status(&self) -> Result<String, BackendError> {
        let response = self
            .send(STATUS_PATH, self.client.get(self.url(STATUS_PATH)))
            .await?;
        let status: StatusResponse = Self::read_json(STATUS_PATH, response).await?;
        Ok(status.message)
    }

    async fn predict(&self) -> Result<PredictionPayload, BackendError> {
        let response = self
            .send(
                PREDICT_PATH,
                self.client
                    .post(self.url(PREDICT_PATH))
                    .header(reqwest::header::CONTENT_TYPE, "application/json"),
            )
            .await?;
        Self::read_json(PREDICT_PATH, response).await
    }

    async fn diagnostic_report(&self, request: &ReportRequest) -> Result<ReportDocument, BackendError> {
        let response = self
            .send(
                REPORT_PATH,
                self.client.post(self.url(REPORT_PATH)).json(request),
            )
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|source| BackendError::Transport {
            endpoint: REPORT_PATH.to_string(),
            source,
        })?;

        Ok(ReportDocument {
            bytes,
            content_type,
        })
    }
}
