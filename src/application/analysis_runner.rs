// Analysis runner - Use case for one diagnostic run
use crate::application::diagnostic_backend::{BackendError, DiagnosticBackend, PredictionPayload};
use crate::domain::prediction::{InvalidPrediction, PredictionResult, Spectrum};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("backend is offline")]
    Offline,
    #[error("an analysis is already running")]
    AlreadyRunning,
    #[error("prediction request failed: {0}")]
    Backend(#[from] BackendError),
    #[error("malformed prediction payload: missing `{0}`")]
    MissingField(&'static str),
    #[error("malformed prediction payload: {0}")]
    Invalid(#[from] InvalidPrediction),
}

impl AnalysisError {
    /// True when the run was refused before any request went out.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AnalysisError::Offline | AnalysisError::AlreadyRunning)
    }
}

#[derive(Clone)]
pub struct AnalysisRunner {
    backend: Arc<dyn DiagnosticBackend>,
    in_flight: Arc<AtomicBool>,
}

/// Handle for the single run allowed in flight. Dropping it frees the slot.
pub struct AnalysisRun {
    backend: Arc<dyn DiagnosticBackend>,
    in_flight: Arc<AtomicBool>,
}

impl AnalysisRunner {
    pub fn new(backend: Arc<dyn DiagnosticBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the in-flight slot, or fail if another run holds it.
    pub fn begin(&self) -> Result<AnalysisRun, AnalysisError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AnalysisError::AlreadyRunning)?;

        Ok(AnalysisRun {
            backend: self.backend.clone(),
            in_flight: self.in_flight.clone(),
        })
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the slot and execute in one step.
    #[cfg(test)]
    pub async fn run(&self) -> Result<PredictionResult, AnalysisError> {
        self.begin()?.execute().await
    }
}

impl AnalysisRun {
    pub async fn execute(&self) -> Result<PredictionResult, AnalysisError> {
        let payload = self.backend.predict().await?;
        parse_prediction(payload)
    }
}

impl Drop for AnalysisRun {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Turn a raw payload into a validated result.
pub fn parse_prediction(payload: PredictionPayload) -> Result<PredictionResult, AnalysisError> {
    let label = payload
        .prediction
        .ok_or(AnalysisError::MissingField("prediction"))?;
    let confidence = payload
        .confidence
        .ok_or(AnalysisError::MissingField("confidence"))?;
    let time = payload.time.ok_or(AnalysisError::MissingField("time"))?;
    let signal = payload.signal.ok_or(AnalysisError::MissingField("signal"))?;

    let spectrum = match (payload.fft_freqs, payload.fft_amps) {
        (Some(freq_samples), Some(amp_samples)) => Some(Spectrum {
            freq_samples,
            amp_samples,
        }),
        (None, None) => None,
        (Some(_), None) => return Err(AnalysisError::MissingField("fft_amps")),
        (None, Some(_)) => return Err(AnalysisError::MissingField("fft_freqs")),
    };

    Ok(PredictionResult::new(label, confidence, time, signal, spectrum)?)
}
