// Connectivity probe - Use case for checking backend reachability
use crate::application::diagnostic_backend::{BackendError, DiagnosticBackend};
use crate::domain::session::ConnectivityStatus;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ConnectivityError {
    #[error("backend unreachable: {0}")]
    Unreachable(#[from] BackendError),
}

#[derive(Clone)]
pub struct ConnectivityProbe {
    backend: Arc<dyn DiagnosticBackend>,
}

impl ConnectivityProbe {
    pub fn new(backend: Arc<dyn DiagnosticBackend>) -> Self {
        Self { backend }
    }

    pub async fn try_probe(&self) -> Result<ConnectivityStatus, ConnectivityError> {
        let message = self.backend.status().await?;
        Ok(ConnectivityStatus::online(message))
    }

    /// Any failure collapses to the offline status; callers retry manually.
    pub async fn probe(&self) -> ConnectivityStatus {
        match self.try_probe().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Connectivity probe failed");
                ConnectivityStatus::offline()
            }
        }
    }
}
