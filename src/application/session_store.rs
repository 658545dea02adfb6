// Session state store - Single owner of the dashboard session state
//
// Every committed state goes through the watch sender, so readers and
// subscribers only ever see whole states. A transition is one
// `send_modify`/`send_if_modified` call.
use crate::application::analysis_runner::{AnalysisError, AnalysisRun, AnalysisRunner};
use crate::application::connectivity_probe::ConnectivityProbe;
use crate::application::diagnostic_backend::DiagnosticBackend;
use crate::application::report_exporter::{ExportError, ReportExporter, SavedReport};
use crate::application::report_sink::ReportSink;
use crate::domain::chart::{to_frequency_series, to_time_series, DEFAULT_FREQUENCY_POINT_CAP};
use crate::domain::history::HistoryEntry;
use crate::domain::prediction::PredictionResult;
use crate::domain::session::{AnalysisStatus, SessionState};
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 12_000.0;
pub const DEFAULT_REPORT_PREFIX: &str = "diagnostic_report";

const HISTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CANCELLED_MESSAGE: &str = "analysis was cancelled before completing";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub frequency_point_cap: usize,
    pub sample_rate_hz: f64,
    pub report_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            frequency_point_cap: DEFAULT_FREQUENCY_POINT_CAP,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
        }
    }
}

pub struct SessionStateStore {
    state_tx: watch::Sender<SessionState>,
    probe: ConnectivityProbe,
    runner: AnalysisRunner,
    exporter: ReportExporter,
    frequency_point_cap: usize,
}

impl SessionStateStore {
    pub fn new(
        backend: Arc<dyn DiagnosticBackend>,
        sink: Arc<dyn ReportSink>,
        settings: SessionSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::new());
        Self {
            state_tx,
            probe: ConnectivityProbe::new(backend.clone()),
            runner: AnalysisRunner::new(backend.clone()),
            exporter: ReportExporter::new(
                backend,
                sink,
                settings.sample_rate_hz,
                settings.report_prefix,
            ),
            frequency_point_cap: settings.frequency_point_cap,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that observes every committed state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub async fn refresh_connectivity(&self) -> SessionState {
        let connectivity = self.probe.probe().await;
        tracing::info!(
            online = connectivity.online,
            status = %connectivity.message,
            "Connectivity refreshed"
        );

        let mut committed = SessionState::new();
        self.state_tx.send_modify(|state| {
            state.connectivity = connectivity;
            committed = state.clone();
        });
        committed
    }

    /// Run one diagnosis. Refused without any state change when the backend
    /// is offline or a run is already in flight.
    pub async fn start_analysis(&self) -> Result<SessionState, AnalysisError> {
        let run = self.runner.begin().inspect_err(|_| {
            tracing::warn!("Analysis rejected: a run is already in flight");
        })?;

        let mut online = true;
        self.state_tx.send_if_modified(|state| {
            if !state.connectivity.online {
                online = false;
                return false;
            }
            state.analysis_status = AnalysisStatus::Running;
            true
        });
        if !online {
            tracing::warn!("Analysis rejected: backend is offline");
            return Err(AnalysisError::Offline);
        }

        tracing::info!("Analysis started");
        let mut active = ActiveRun {
            run,
            state_tx: &self.state_tx,
            committed: false,
        };
        let outcome = active.run.execute().await;

        // Commit before `active` is dropped so a newer run cannot be overtaken.
        let outcome = match outcome {
            Ok(result) => {
                tracing::info!(
                    condition = result.condition().as_str(),
                    label = result.label(),
                    confidence = result.confidence(),
                    "Analysis succeeded"
                );
                let timestamp = chrono::Local::now()
                    .format(HISTORY_TIMESTAMP_FORMAT)
                    .to_string();
                let mut committed = SessionState::new();
                self.state_tx.send_modify(|state| {
                    self.apply_success(state, result, timestamp);
                    committed = state.clone();
                });
                Ok(committed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed");
                let message = e.to_string();
                self.state_tx.send_modify(|state| {
                    state.analysis_status = AnalysisStatus::Failed;
                    state.last_error = Some(message);
                });
                Err(e)
            }
        };
        active.committed = true;
        drop(active);
        outcome
    }

    pub async fn download_report(&self) -> Result<SavedReport, ExportError> {
        let last_result = self.state_tx.borrow().last_result.clone();
        self.exporter
            .export(last_result.as_ref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Report export failed"))
    }

    fn apply_success(&self, state: &mut SessionState, result: PredictionResult, timestamp: String) {
        state.time_series = Some(to_time_series(&result));
        state.freq_series = to_frequency_series(&result, self.frequency_point_cap);
        state.history.append(HistoryEntry::new(
            uuid::Uuid::new_v4().to_string(),
            timestamp,
            result.condition(),
            result.confidence(),
        ));
        state.last_result = Some(result);
        state.last_error = None;
        state.analysis_status = AnalysisStatus::Succeeded;
    }
}

/// A claimed run whose outcome is not yet in the state. Dropping it
/// uncommitted (the caller's future was cancelled) marks the run `Failed`
/// before the in-flight slot is released.
struct ActiveRun<'a> {
    run: AnalysisRun,
    state_tx: &'a watch::Sender<SessionState>,
    committed: bool,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        tracing::warn!("Analysis cancelled before the backend answered");
        self.state_tx.send_if_modified(|state| {
            if state.analysis_status != AnalysisStatus::Running {
                return false;
            }
            state.analysis_status = AnalysisStatus::Failed;
            state.last_error = Some(CANCELLED_MESSAGE.to_string());
            true
        });
    }
}
