// Session domain model - The aggregate read by the view layer
use super::chart::ChartSeries;
use super::history::HistoryLog;
use super::prediction::PredictionResult;

pub const OFFLINE_MESSAGE: &str = "Backend Offline";
pub const CHECKING_MESSAGE: &str = "Checking...";

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityStatus {
    pub online: bool,
    pub message: String,
}

impl ConnectivityStatus {
    pub fn online(message: String) -> Self {
        Self {
            online: true,
            message,
        }
    }

    pub fn offline() -> Self {
        Self {
            online: false,
            message: OFFLINE_MESSAGE.to_string(),
        }
    }

    /// State before the first probe has completed.
    pub fn unknown() -> Self {
        Self {
            online: false,
            message: CHECKING_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Running => "running",
            AnalysisStatus::Succeeded => "succeeded",
            AnalysisStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub connectivity: ConnectivityStatus,
    pub analysis_status: AnalysisStatus,
    pub last_result: Option<PredictionResult>,
    pub time_series: Option<ChartSeries>,
    pub freq_series: Option<ChartSeries>,
    pub history: HistoryLog,
    /// Message of the latest failed run; cleared by the next success.
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            connectivity: ConnectivityStatus::unknown(),
            analysis_status: AnalysisStatus::Idle,
            last_result: None,
            time_series: None,
            freq_series: None,
            history: HistoryLog::new(),
            last_error: None,
        }
    }

    pub fn can_start_analysis(&self) -> bool {
        self.connectivity.online && self.analysis_status != AnalysisStatus::Running
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_and_offline() {
        let state = SessionState::new();

        assert_eq!(state.analysis_status, AnalysisStatus::Idle);
        assert!(!state.connectivity.online);
        assert!(state.last_result.is_none());
        assert!(state.history.is_empty());
        assert!(!state.can_start_analysis());
    }

    #[test]
    fn test_can_start_analysis_requires_online_and_not_running() {
        let mut state = SessionState::new();
        state.connectivity = ConnectivityStatus::online("Backend Ready".to_string());
        assert!(state.can_start_analysis());

        state.analysis_status = AnalysisStatus::Running;
        assert!(!state.can_start_analysis());

        state.analysis_status = AnalysisStatus::Failed;
        assert!(state.can_start_analysis());
    }
}
