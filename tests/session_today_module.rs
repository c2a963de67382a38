use chrono::NaiveDate;
use serde_json::json;
use session_inbox::session::{find_session_for_date, TodaySessionError};
use std::fs;
use std::path::Path;

fn script_json(step: serde_json::Value) -> String {
    json!({
        "session_id": "w43_mon",
        "session_name": "Monday strength",
        "total_steps": 1,
        "steps": [step]
    })
    .to_string()
}

fn valid_step() -> serde_json::Value {
    json!({
        "step_no": 1,
        "action_name": "Deadlift",
        "action_type": "reps",
        "sets": 5,
        "rest_seconds": 120,
        "phase": "main"
    })
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("date")
}

fn week_dir(sessions: &Path) -> std::path::PathBuf {
    let dir = sessions.join("week2026_43");
    fs::create_dir_all(&dir).expect("mkdir week");
    dir
}

#[test]
fn session_today_reports_missing_session() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = find_session_for_date(tmp.path(), monday()).expect_err("missing");
    assert_eq!(err, TodaySessionError::NoSessionForToday);
    assert_eq!(err.status_code(), "NO_SESSION_FOR_TODAY");

    let dir = week_dir(tmp.path());
    fs::write(dir.join("session_20261020_tuesday.json"), script_json(valid_step()))
        .expect("write other day");
    let err = find_session_for_date(tmp.path(), monday()).expect_err("other day only");
    assert_eq!(err, TodaySessionError::NoSessionForToday);
}

#[test]
fn session_today_picks_first_match_in_lexical_order() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = week_dir(tmp.path());
    fs::write(dir.join("session_20261019_b.json"), "{ not json").expect("write b");
    fs::write(dir.join("session_20261019_a.json"), script_json(valid_step())).expect("write a");

    let today = find_session_for_date(tmp.path(), monday()).expect("found");
    assert_eq!(today.path, dir.join("session_20261019_a.json"));
    assert_eq!(today.script.session_name, "Monday strength");
    assert_eq!(today.payload["steps"][0]["action_name"], "Deadlift");
}

#[test]
fn session_today_flags_unparsable_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = week_dir(tmp.path());
    fs::write(dir.join("session_20261019_main.json"), "{ not json").expect("write");

    let err = find_session_for_date(tmp.path(), monday()).expect_err("invalid file");
    assert!(matches!(err, TodaySessionError::InvalidFile(_)));
    assert!(err.status_code().starts_with("INVALID_SESSION_FILE: "));
}

#[test]
fn session_today_flags_contract_violation() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = week_dir(tmp.path());
    let mut step = valid_step();
    step.as_object_mut().expect("step").remove("phase");
    fs::write(dir.join("session_20261019_main.json"), script_json(step)).expect("write");

    let err = find_session_for_date(tmp.path(), monday()).expect_err("invalid contract");
    assert_eq!(
        err.status_code(),
        "INVALID_SESSION_CONTRACT: steps[0] missing field: phase"
    );
}
