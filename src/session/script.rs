use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const REQUIRED_SCRIPT_FIELDS: [&str; 4] = ["session_id", "session_name", "total_steps", "steps"];
const REQUIRED_STEP_FIELDS: [&str; 6] = [
    "step_no",
    "action_name",
    "action_type",
    "sets",
    "rest_seconds",
    "phase",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Reps,
    Timed,
}

impl ActionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "reps" => Some(Self::Reps),
            "timed" => Some(Self::Timed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warmup,
    Main,
    Cooldown,
}

impl Phase {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "warmup" => Some(Self::Warmup),
            "main" => Some(Self::Main),
            "cooldown" => Some(Self::Cooldown),
            _ => None,
        }
    }
}

/// A prescribed session. Only the enum fields are typed; everything else is
/// carried as found in the file, unknown fields included in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionScript {
    pub session_id: Value,
    pub session_name: Value,
    pub total_steps: Value,
    pub steps: Vec<ScriptStep>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptStep {
    pub step_no: Value,
    pub action_name: Value,
    pub action_type: ActionType,
    pub sets: Value,
    pub rest_seconds: Value,
    pub phase: Phase,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Checks `payload` against the session script contract: required fields
/// present, `steps` a non-empty array, enum fields in range. The error string
/// names the first offending field.
pub fn validate_session_script(payload: &Value) -> Result<SessionScript, String> {
    let Some(script) = payload.as_object() else {
        return Err("session script root must be a JSON object".to_string());
    };
    for key in REQUIRED_SCRIPT_FIELDS {
        if !script.contains_key(key) {
            return Err(format!("missing field: {key}"));
        }
    }

    let steps = match script.get("steps") {
        Some(Value::Array(steps)) if !steps.is_empty() => steps,
        _ => return Err("steps must be a non-empty array".to_string()),
    };
    for (index, step) in steps.iter().enumerate() {
        validate_step(index, step)?;
    }

    serde_json::from_value(payload.clone()).map_err(|err| err.to_string())
}

fn validate_step(index: usize, step: &Value) -> Result<(), String> {
    let Some(step) = step.as_object() else {
        return Err(format!("steps[{index}] must be an object"));
    };
    for key in REQUIRED_STEP_FIELDS {
        if !step.contains_key(key) {
            return Err(format!("steps[{index}] missing field: {key}"));
        }
    }

    if step
        .get("action_type")
        .and_then(Value::as_str)
        .and_then(ActionType::parse)
        .is_none()
    {
        return Err(format!("steps[{index}].action_type must be reps|timed"));
    }
    if step
        .get("phase")
        .and_then(Value::as_str)
        .and_then(Phase::parse)
        .is_none()
    {
        return Err(format!("steps[{index}].phase must be warmup|main|cooldown"));
    }
    Ok(())
}
