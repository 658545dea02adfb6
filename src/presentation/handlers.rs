// HTTP request handlers
use crate::application::report_exporter::ExportError;
use crate::infrastructure::ndjson_stream::ndjson_stream;
use crate::presentation::app_state::AppState;
use crate::presentation::view_mapper::{report_to_view, session_to_view};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current session state
pub async fn get_session(State(state): State<Arc<AppState>>) -> Response {
    Json(session_to_view(&state.session.state())).into_response()
}

/// Re-probe the backend
pub async fn refresh_connectivity(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.refresh_connectivity().await;
    Json(session_to_view(&session)).into_response()
}

/// Run one diagnosis
pub async fn start_analysis(State(state): State<Arc<AppState>>) -> Response {
    match state.session.start_analysis().await {
        Ok(session) => Json(session_to_view(&session)).into_response(),
        Err(e) if e.is_rejection() => error_response(StatusCode::CONFLICT, &e),
        Err(_) => {
            // The failed state carries the error for the dashboard
            let view = session_to_view(&state.session.state());
            (StatusCode::BAD_GATEWAY, Json(view)).into_response()
        }
    }
}

/// Export a report for the last result
pub async fn download_report(State(state): State<Arc<AppState>>) -> Response {
    match state.session.download_report().await {
        Ok(report) => Json(report_to_view(report)).into_response(),
        Err(e @ ExportError::NoResult) => error_response(StatusCode::CONFLICT, &e),
        Err(e @ ExportError::Backend(_)) => error_response(StatusCode::BAD_GATEWAY, &e),
        Err(e @ ExportError::Save(_)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// Stream the current state, then every committed change
pub async fn stream_session(State(state): State<Arc<AppState>>) -> Response {
    let mut rx = state.session.subscribe();
    let stream = async_stream::stream! {
        loop {
            let view = session_to_view(&rx.borrow_and_update());
            yield view;
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    ndjson_stream(stream)
}

fn error_response(status: StatusCode, error: &dyn std::error::Error) -> Response {
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
