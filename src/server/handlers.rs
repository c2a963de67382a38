use super::AppState;
use crate::session::{self, SaveRequest, SavedSession, TodaySessionError};
use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct TodaySessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_script: Option<Value>,
    pub status_code: Option<String>,
}

impl TodaySessionResponse {
    fn failure(error: &TodaySessionError) -> Self {
        Self {
            success: false,
            session_file_path: None,
            session_script: None,
            status_code: Some(error.status_code()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SaveSessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_result_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_logs_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_run_path: Option<String>,
    pub error: Option<String>,
}

impl From<&SavedSession> for SaveSessionResponse {
    fn from(saved: &SavedSession) -> Self {
        Self {
            success: true,
            saved_dir: Some(saved.saved_dir.display().to_string()),
            session_result_path: Some(saved.session_result_path.display().to_string()),
            event_logs_path: Some(saved.event_logs_path.display().to_string()),
            run_file_path: saved
                .run
                .as_ref()
                .map(|run| run.run_file_path.display().to_string()),
            latest_run_path: saved
                .run
                .as_ref()
                .map(|run| run.latest_run_path.display().to_string()),
            error: None,
        }
    }
}

/// Lookup failures are reported in the body; the HTTP status is always 200.
pub async fn today_session(State(state): State<AppState>) -> Json<TodaySessionResponse> {
    let Some(training) = state.settings.training.as_ref() else {
        return Json(TodaySessionResponse::failure(
            &TodaySessionError::NoSessionForToday,
        ));
    };

    let sessions_dir = training.sessions_dir();
    let lookup = tokio::task::spawn_blocking(move || session::find_today_session(&sessions_dir))
        .await
        .unwrap_or_else(|err| Err(TodaySessionError::InvalidFile(err.to_string())));

    match lookup {
        Ok(today) => {
            state.log(
                "info",
                "today.found",
                &format!(
                    "session `{}` ({} steps) at {}",
                    today.script.session_id,
                    today.script.steps.len(),
                    today.path.display()
                ),
            );
            Json(TodaySessionResponse {
                success: true,
                session_file_path: Some(today.path.display().to_string()),
                session_script: Some(today.payload),
                status_code: None,
            })
        }
        Err(err) => {
            let event = match err {
                TodaySessionError::NoSessionForToday => "today.missing",
                _ => "today.invalid",
            };
            state.log("warn", event, &err.status_code());
            Json(TodaySessionResponse::failure(&err))
        }
    }
}

pub async fn save_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<SaveSessionResponse>) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let request = match SaveRequest::from_request_parts(content_type, &body) {
        Ok(request) => request,
        Err(err) => {
            state.log("warn", "session.rejected", &err.to_string());
            return (
                StatusCode::BAD_REQUEST,
                Json(SaveSessionResponse {
                    error: Some(err.to_string()),
                    ..SaveSessionResponse::default()
                }),
            );
        }
    };

    let session_name = request.session_name.clone();
    let settings = state.settings.clone();
    let saved = tokio::task::spawn_blocking(move || session::save_session(&settings, &request))
        .await
        .map_err(|err| err.to_string())
        .and_then(|result| result.map_err(|err| err.to_string()));

    match saved {
        Ok(saved) => {
            state.log(
                "info",
                "session.saved",
                &format!(
                    "saved `{}` to {}",
                    session_name,
                    saved.session_result_path.display()
                ),
            );
            (StatusCode::OK, Json(SaveSessionResponse::from(&saved)))
        }
        Err(err) => {
            state.log("error", "session.save_failed", &err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveSessionResponse {
                    saved_dir: Some(state.settings.inbox_dir.display().to_string()),
                    error: Some(err),
                    ..SaveSessionResponse::default()
                }),
            )
        }
    }
}

pub async fn save_session_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
