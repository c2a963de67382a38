use super::error::SaveError;
use super::run_record::{write_json, write_run_result, RunRecord};
use crate::config::Settings;
use crate::shared::slug::{sanitize_timestamp, slugify};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_RESULT_SUFFIX: &str = "session_result.json";
pub const EVENT_LOGS_SUFFIX: &str = "event_logs.json";

/// A `POST /save-session` body that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub session_result: Map<String, Value>,
    pub event_logs: Vec<Value>,
    pub session_name: String,
    pub timestamp: Option<String>,
    pub session_file_path: Value,
    pub completed_steps: Option<Vec<Value>>,
}

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return false;
    };
    let mime = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

impl SaveRequest {
    /// Reads the body only when it is declared as JSON; anything else is
    /// treated as an empty request.
    pub fn from_request_parts(content_type: Option<&str>, body: &[u8]) -> Result<Self, SaveError> {
        if is_json_content_type(content_type) {
            Self::from_body(body)
        } else {
            Self::from_map(Map::new())
        }
    }

    /// Bodies that are not a JSON object are read as `{}` and then fail the
    /// field checks like any other incomplete request.
    pub fn from_body(body: &[u8]) -> Result<Self, SaveError> {
        let payload = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self::from_map(payload)
    }

    pub fn from_map(mut payload: Map<String, Value>) -> Result<Self, SaveError> {
        let Some(Value::Object(session_result)) = payload.remove("session_result") else {
            return Err(SaveError::InvalidRequest(
                "session_result must be an object".to_string(),
            ));
        };
        let Some(Value::Array(event_logs)) = payload.remove("event_logs") else {
            return Err(SaveError::InvalidRequest(
                "event_logs must be an array".to_string(),
            ));
        };
        let session_name = match payload.remove("session_name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => {
                return Err(SaveError::InvalidRequest(
                    "session_name is required".to_string(),
                ))
            }
        };
        let timestamp = match payload.remove("timestamp") {
            Some(Value::String(raw)) => Some(raw),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        };
        let completed_steps = match payload.remove("completed_steps") {
            Some(Value::Array(steps)) => Some(steps),
            _ => None,
        };

        Ok(Self {
            session_result,
            event_logs,
            session_name,
            timestamp,
            session_file_path: payload.remove("session_file_path").unwrap_or(Value::Null),
            completed_steps,
        })
    }

    /// `<timestamp>__<slug>`, shared by both inbox files.
    pub fn file_prefix(&self) -> String {
        format!(
            "{}__{}",
            sanitize_timestamp(self.timestamp.as_deref()),
            slugify(&self.session_name)
        )
    }

    pub fn run_record(&self) -> RunRecord {
        RunRecord::build(
            &self.session_result,
            &self.event_logs,
            self.session_file_path.clone(),
            self.completed_steps.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRun {
    pub run_file_path: PathBuf,
    pub latest_run_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub saved_dir: PathBuf,
    pub session_result_path: PathBuf,
    pub event_logs_path: PathBuf,
    /// Present only when a training root is configured.
    pub run: Option<SavedRun>,
}

fn create_dir(path: &Path) -> Result<(), SaveError> {
    fs::create_dir_all(path).map_err(|source| SaveError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

/// Writes the inbox pair and, with a training root configured, the derived run
/// record and latest pointer. Files written before a failure are left behind.
pub fn save_session(settings: &Settings, request: &SaveRequest) -> Result<SavedSession, SaveError> {
    create_dir(&settings.inbox_dir)?;
    if let Some(training) = &settings.training {
        create_dir(&training.runs_dir())?;
    }

    let prefix = request.file_prefix();
    let session_result_path = settings
        .inbox_dir
        .join(format!("{prefix}__{SESSION_RESULT_SUFFIX}"));
    let event_logs_path = settings
        .inbox_dir
        .join(format!("{prefix}__{EVENT_LOGS_SUFFIX}"));

    write_json(&session_result_path, &request.session_result)?;
    write_json(&event_logs_path, &request.event_logs)?;

    let run = match &settings.training {
        Some(training) => Some(SavedRun {
            run_file_path: write_run_result(training, &request.run_record())?,
            latest_run_path: training.latest_run_path(),
        }),
        None => None,
    };

    Ok(SavedSession {
        saved_dir: settings.inbox_dir.clone(),
        session_result_path,
        event_logs_path,
        run,
    })
}
