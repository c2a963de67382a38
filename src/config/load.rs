use super::paths::{default_state_root, CONFIG_PATH_ENV, GLOBAL_SETTINGS_FILE_NAME};
use super::{ConfigError, Settings, TrainingSettings};
use std::path::{Path, PathBuf};

pub const BIND_ENV: &str = "SESSION_INBOX_BIND";
pub const INBOX_DIR_ENV: &str = "SESSION_INBOX_INBOX_DIR";
pub const TRAINING_ROOT_ENV: &str = "SESSION_INBOX_TRAINING_ROOT";
pub const LOG_DIR_ENV: &str = "SESSION_INBOX_LOG_DIR";

/// Startup overrides read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsEnv {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub inbox_dir: Option<PathBuf>,
    pub training_root: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl SettingsEnv {
    pub fn from_process() -> Self {
        Self {
            config_path: non_empty_var(CONFIG_PATH_ENV).map(PathBuf::from),
            bind: non_empty_var(BIND_ENV),
            inbox_dir: non_empty_var(INBOX_DIR_ENV).map(PathBuf::from),
            training_root: non_empty_var(TRAINING_ROOT_ENV).map(PathBuf::from),
            log_dir: non_empty_var(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn settings_file_path(env: &SettingsEnv, state_root: &Path) -> PathBuf {
    env.config_path
        .clone()
        .unwrap_or_else(|| state_root.join(GLOBAL_SETTINGS_FILE_NAME))
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    let state_root = default_state_root()?;
    load_settings_from(&SettingsEnv::from_process(), &state_root)
}

/// Reads the settings file (or falls back to defaults when it does not exist),
/// applies environment overrides and validates the result.
pub fn load_settings_from(env: &SettingsEnv, state_root: &Path) -> Result<Settings, ConfigError> {
    let path = settings_file_path(env, state_root);
    let mut settings = if path.exists() {
        Settings::from_path(&path)?
    } else if env.config_path.is_some() {
        return Err(ConfigError::Read {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    } else {
        Settings::defaults(state_root)
    };

    if let Some(raw) = &env.bind {
        settings.bind = raw.trim().parse().map_err(|err| ConfigError::Env {
            name: BIND_ENV.to_string(),
            reason: format!("`{raw}` is not a socket address: {err}"),
        })?;
    }
    if let Some(inbox_dir) = &env.inbox_dir {
        settings.inbox_dir = inbox_dir.clone();
    }
    if let Some(log_dir) = &env.log_dir {
        settings.log_dir = Some(log_dir.clone());
    }
    if let Some(root) = &env.training_root {
        match settings.training.as_mut() {
            Some(training) => training.root = root.clone(),
            None => settings.training = Some(TrainingSettings::new(root.clone())),
        }
    }

    settings.validate()?;
    Ok(settings)
}
