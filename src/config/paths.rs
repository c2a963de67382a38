use crate::config::ConfigError;
use std::path::PathBuf;

pub const GLOBAL_STATE_DIR: &str = ".session-inbox";
pub const GLOBAL_SETTINGS_FILE_NAME: &str = "config.yaml";
pub const CONFIG_PATH_ENV: &str = "SESSION_INBOX_CONFIG";

pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_INBOX_DIR_NAME: &str = "inbox";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";
pub const DEFAULT_SESSIONS_DIR_NAME: &str = "06_sessions";
pub const DEFAULT_RUNS_DIR_NAME: &str = "07_runs";
pub const LATEST_RUN_FILE_NAME: &str = "latest_run.json";

pub fn default_state_root() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(GLOBAL_STATE_DIR))
}
