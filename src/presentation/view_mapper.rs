// Mapper to convert session state into the JSON view read by the dashboard
use crate::application::report_exporter::SavedReport;
use crate::domain::chart::ChartSeries;
use crate::domain::history::HistoryEntry;
use crate::domain::prediction::PredictionResult;
use crate::domain::session::SessionState;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub connectivity: ConnectivityView,
    pub analysis_status: &'static str,
    pub can_start_analysis: bool,
    pub result: Option<ResultView>,
    pub time_series: Option<SeriesView>,
    pub freq_series: Option<SeriesView>,
    pub history: Vec<HistoryView>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityView {
    pub online: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub condition: &'static str,
    pub label: String,
    pub confidence: f64,
    pub confidence_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesView {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub id: String,
    pub timestamp: String,
    pub condition: &'static str,
    pub confidence: f64,
    pub confidence_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedReportView {
    pub filename: String,
    pub path: String,
    pub bytes: usize,
}

pub fn session_to_view(state: &SessionState) -> SessionView {
    SessionView {
        connectivity: ConnectivityView {
            online: state.connectivity.online,
            message: state.connectivity.message.clone(),
        },
        analysis_status: state.analysis_status.as_str(),
        can_start_analysis: state.can_start_analysis(),
        result: state.last_result.as_ref().map(result_to_view),
        time_series: state.time_series.as_ref().map(series_to_view),
        freq_series: state.freq_series.as_ref().map(series_to_view),
        history: state.history.entries().map(history_to_view).collect(),
        last_error: state.last_error.clone(),
    }
}

pub fn report_to_view(report: SavedReport) -> SavedReportView {
    SavedReportView {
        filename: report.filename,
        path: report.path.display().to_string(),
        bytes: report.bytes,
    }
}

/// Confidence as a percentage with one decimal, e.g. `0.92` -> `"92.0%"`.
pub fn confidence_display(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn result_to_view(result: &PredictionResult) -> ResultView {
    ResultView {
        condition: result.condition().as_str(),
        label: result.label().to_string(),
        confidence: result.confidence(),
        confidence_display: confidence_display(result.confidence()),
    }
}

fn series_to_view(series: &ChartSeries) -> SeriesView {
    SeriesView {
        labels: series.labels().to_vec(),
        values: series.values().to_vec(),
    }
}

fn history_to_view(entry: &HistoryEntry) -> HistoryView {
    HistoryView {
        id: entry.id.clone(),
        timestamp: entry.timestamp.clone(),
        condition: entry.condition.as_str(),
        confidence: entry.confidence,
        confidence_display: confidence_display(entry.confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::to_time_series;
    use crate::domain::prediction::Condition;
    use crate::domain::session::{AnalysisStatus, ConnectivityStatus};
    use serde_json::json;

    #[test]
    fn test_confidence_display() {
        assert_eq!(confidence_display(0.92), "92.0%");
        assert_eq!(confidence_display(1.0), "100.0%");
        assert_eq!(confidence_display(0.0), "0.0%");
    }

    #[test]
    fn test_session_view_json_shape() {
        let result = PredictionResult::new(
            "Outer Race".to_string(),
            0.5,
            vec![0.0, 0.001],
            vec![0.2, 0.4],
            None,
        )
        .unwrap();
        let mut state = SessionState::new();
        state.connectivity = ConnectivityStatus::online("Backend Ready".to_string());
        state.analysis_status = AnalysisStatus::Succeeded;
        state.time_series = Some(to_time_series(&result));
        state.history.append(HistoryEntry::new(
            "id-1".to_string(),
            "2026-10-16 09:30:00".to_string(),
            Condition::Fault,
            0.5,
        ));
        state.last_result = Some(result);

        let value = serde_json::to_value(session_to_view(&state)).unwrap();

        assert_eq!(value["connectivity"], json!({"online": true, "message": "Backend Ready"}));
        assert_eq!(value["analysisStatus"], "succeeded");
        assert_eq!(value["canStartAnalysis"], true);
        assert_eq!(
            value["result"],
            json!({
                "condition": "Fault",
                "label": "Outer Race",
                "confidence": 0.5,
                "confidenceDisplay": "50.0%"
            })
        );
        assert_eq!(value["timeSeries"]["labels"], json!(["0.000", "0.001"]));
        assert_eq!(value["freqSeries"], json!(null));
        assert_eq!(value["history"][0]["condition"], "Fault");
        assert_eq!(value["history"][0]["timestamp"], "2026-10-16 09:30:00");
    }
}
