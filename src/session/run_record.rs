use super::error::SaveError;
use crate::config::TrainingSettings;
use crate::shared::fs_atomic::{atomic_write_json, JsonWriteError};
use crate::shared::slug::{format_timestamp, slugify};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const UNKNOWN_SESSION_ID: &str = "unknown_session";

/// Event codes emitted by the session timer client. Logs may carry codes
/// outside this set; they are stored untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCode {
    Pause,
    Resume,
    Skip,
    RestStart,
    RestExtend,
    RestEnd,
    EndSession,
    SessionComplete,
    PostFeedbackSubmit,
}

impl EventCode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            "skip" => Some(Self::Skip),
            "rest_start" => Some(Self::RestStart),
            "rest_extend" => Some(Self::RestExtend),
            "rest_end" => Some(Self::RestEnd),
            "end_session" => Some(Self::EndSession),
            "session_complete" => Some(Self::SessionComplete),
            "post_feedback_submit" => Some(Self::PostFeedbackSubmit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub time: Value,
    #[serde(rename = "type")]
    pub event_type: Value,
    pub current_step_no: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub session_id: Value,
    pub session_file_path: Value,
    pub start_time: Value,
    pub end_time: Value,
    pub duration_seconds: Value,
    #[serde(default)]
    pub completed_steps: Vec<Value>,
    #[serde(default)]
    pub skipped_steps: Vec<i64>,
    #[serde(default)]
    pub event_log: Vec<NormalizedEvent>,
}

impl RunRecord {
    pub fn build(
        session_result: &serde_json::Map<String, Value>,
        event_logs: &[Value],
        session_file_path: Value,
        completed_steps: Option<&[Value]>,
    ) -> Self {
        let field = |key: &str| session_result.get(key).cloned().unwrap_or(Value::Null);
        Self {
            session_id: field("session_id"),
            session_file_path,
            start_time: field("start_time"),
            end_time: field("end_time"),
            duration_seconds: field("duration_seconds"),
            completed_steps: completed_steps.map(<[Value]>::to_vec).unwrap_or_default(),
            skipped_steps: extract_skipped_steps(event_logs),
            event_log: normalize_event_log(event_logs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRunPointer {
    pub latest_run_path: String,
}

fn step_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

/// Distinct step numbers of `skip` events, ascending.
pub fn extract_skipped_steps(event_logs: &[Value]) -> Vec<i64> {
    event_logs
        .iter()
        .filter(|event| {
            event.get("event_code").and_then(Value::as_str).and_then(EventCode::parse)
                == Some(EventCode::Skip)
        })
        .filter_map(|event| event.get("step_no").and_then(step_number))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn normalize_event_log(event_logs: &[Value]) -> Vec<NormalizedEvent> {
    event_logs
        .iter()
        .map(|event| {
            let field = |key: &str| event.get(key).cloned().unwrap_or(Value::Null);
            NormalizedEvent {
                time: field("timestamp"),
                event_type: field("event_code"),
                current_step_no: field("step_no"),
            }
        })
        .collect()
}

pub fn run_file_name(session_id: &Value, at: DateTime<Local>) -> String {
    let raw_id = match session_id {
        Value::String(id) if !id.is_empty() => id.clone(),
        Value::Number(number) => number.to_string(),
        _ => UNKNOWN_SESSION_ID.to_string(),
    };
    format!("run_{}_{}.json", format_timestamp(at), slugify(&raw_id))
}

pub fn write_run_result(
    training: &TrainingSettings,
    record: &RunRecord,
) -> Result<PathBuf, SaveError> {
    write_run_result_at(training, record, Local::now())
}

/// Writes the record, then points `latest_run.json` at it. Both writes go
/// through temp-file-and-rename, record first.
pub fn write_run_result_at(
    training: &TrainingSettings,
    record: &RunRecord,
    at: DateTime<Local>,
) -> Result<PathBuf, SaveError> {
    let runs_dir = training.runs_dir();
    fs::create_dir_all(&runs_dir).map_err(|source| SaveError::CreateDir {
        path: runs_dir.display().to_string(),
        source,
    })?;

    let run_path = runs_dir.join(run_file_name(&record.session_id, at));
    write_json(&run_path, record)?;

    let pointer = LatestRunPointer {
        latest_run_path: run_path.display().to_string(),
    };
    write_json(&training.latest_run_path(), &pointer)?;

    Ok(run_path)
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SaveError> {
    atomic_write_json(path, value).map_err(|err| match err {
        JsonWriteError::Encode(source) => SaveError::Encode {
            path: path.display().to_string(),
            source,
        },
        JsonWriteError::Io(source) => SaveError::Write {
            path: path.display().to_string(),
            source,
        },
    })
}
