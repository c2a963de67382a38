use chrono::{Local, TimeZone};
use serde_json::{json, Value};
use session_inbox::config::TrainingSettings;
use session_inbox::session::run_record::write_run_result_at;
use session_inbox::session::{
    extract_skipped_steps, normalize_event_log, EventCode, LatestRunPointer, RunRecord,
};
use std::fs;

fn sample_logs() -> Vec<Value> {
    vec![
        json!({"timestamp": "2026-10-19T08:00:00", "event_code": "skip", "step_no": 5}),
        json!({"timestamp": "2026-10-19T08:01:00", "event_code": "pause", "step_no": 2}),
        json!({"timestamp": "2026-10-19T08:02:00", "event_code": "skip", "step_no": 3}),
        json!({"timestamp": "2026-10-19T08:03:00", "event_code": "skip", "step_no": 5}),
        json!({"timestamp": "2026-10-19T08:04:00", "event_code": "warp_drive"}),
    ]
}

#[test]
fn session_run_record_extracts_sorted_distinct_skips() {
    assert_eq!(extract_skipped_steps(&sample_logs()), vec![3, 5]);
    assert_eq!(EventCode::parse("rest_extend"), Some(EventCode::RestExtend));
    assert_eq!(EventCode::parse("warp_drive"), None);
}

#[test]
fn session_run_record_normalizes_event_fields() {
    let normalized = normalize_event_log(&sample_logs());
    assert_eq!(normalized.len(), 5);

    let encoded = serde_json::to_value(&normalized).expect("encode");
    assert_eq!(
        encoded[1],
        json!({"time": "2026-10-19T08:01:00", "type": "pause", "current_step_no": 2})
    );
    assert_eq!(encoded[4]["current_step_no"], Value::Null);
}

#[test]
fn session_run_record_copies_result_fields_and_defaults_completed_steps() {
    let result = json!({
        "session_id": "s1",
        "start_time": "08:00",
        "end_time": "08:45",
        "duration_seconds": 2700,
        "rating": 4
    });
    let record = RunRecord::build(
        result.as_object().expect("object"),
        &sample_logs(),
        json!("/training/06_sessions/week2026_43/session_20261019_a.json"),
        None,
    );
    let encoded = serde_json::to_value(&record).expect("encode");
    assert_eq!(encoded["session_id"], "s1");
    assert_eq!(encoded["duration_seconds"], 2700);
    assert_eq!(encoded["completed_steps"], json!([]));
    assert_eq!(encoded["skipped_steps"], json!([3, 5]));
    assert!(encoded.get("rating").is_none());
}

#[test]
fn session_run_record_writer_updates_latest_pointer() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let training = TrainingSettings::new(tmp.path().join("training"));
    let record = RunRecord::build(
        json!({"session_id": "Week 43 Monday"}).as_object().expect("object"),
        &[],
        Value::Null,
        Some(&[json!(1), json!(2)][..]),
    );

    let first_at = Local
        .with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .expect("time");
    let second_at = Local
        .with_ymd_and_hms(2026, 10, 19, 9, 30, 0)
        .single()
        .expect("time");

    let first = write_run_result_at(&training, &record, first_at).expect("first run");
    assert_eq!(
        first,
        training.runs_dir().join("run_20261019_090000_week_43_monday.json")
    );
    let second = write_run_result_at(&training, &record, second_at).expect("second run");

    let stored: RunRecord =
        serde_json::from_str(&fs::read_to_string(&first).expect("read run")).expect("decode run");
    assert_eq!(stored, record);

    let pointer: LatestRunPointer = serde_json::from_str(
        &fs::read_to_string(training.latest_run_path()).expect("read pointer"),
    )
    .expect("decode pointer");
    assert_eq!(pointer.latest_run_path, second.display().to_string());
}
