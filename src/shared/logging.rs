use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SERVICE_LOG_FILE_NAME: &str = "service.log";

pub fn service_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(SERVICE_LOG_FILE_NAME)
}

/// Appends one JSON object per line. Logging never fails the caller.
pub fn append_service_log(log_path: &Path, level: &str, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": chrono::Local::now().to_rfc3339(),
        "level": level,
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    if let Some(parent) = log_path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
