use super::paths::{
    DEFAULT_INBOX_DIR_NAME, DEFAULT_LOG_DIR_NAME, DEFAULT_PORT, DEFAULT_RUNS_DIR_NAME,
    DEFAULT_SESSIONS_DIR_NAME, LATEST_RUN_FILE_NAME,
};
use super::ConfigError;
use crate::shared::logging::service_log_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

/// Which endpoints the service exposes. `Extended` is enabled by configuring a
/// training root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    Minimal,
    Extended,
}

impl ServiceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Extended => "extended",
        }
    }

    pub fn allowed_methods(self) -> &'static str {
        match self {
            Self::Minimal => "POST, OPTIONS",
            Self::Extended => "GET, POST, OPTIONS",
        }
    }
}

impl std::fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    pub inbox_dir: PathBuf,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub training: Option<TrainingSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingSettings {
    pub root: PathBuf,
    #[serde(default = "default_sessions_dir_name")]
    pub sessions_dir_name: String,
    #[serde(default = "default_runs_dir_name")]
    pub runs_dir_name: String,
}

impl TrainingSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sessions_dir_name: default_sessions_dir_name(),
            runs_dir_name: default_runs_dir_name(),
        }
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join(&self.sessions_dir_name)
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.root.join(&self.runs_dir_name)
    }

    pub fn latest_run_path(&self) -> PathBuf {
        self.runs_dir().join(LATEST_RUN_FILE_NAME)
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
}

fn default_sessions_dir_name() -> String {
    DEFAULT_SESSIONS_DIR_NAME.to_string()
}

fn default_runs_dir_name() -> String {
    DEFAULT_RUNS_DIR_NAME.to_string()
}

impl Settings {
    /// Settings used when no config file exists: minimal mode, everything
    /// under `state_root`.
    pub fn defaults(state_root: &Path) -> Self {
        Self {
            bind: default_bind(),
            inbox_dir: state_root.join(DEFAULT_INBOX_DIR_NAME),
            log_dir: Some(state_root.join(DEFAULT_LOG_DIR_NAME)),
            training: None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn mode(&self) -> ServiceMode {
        if self.training.is_some() {
            ServiceMode::Extended
        } else {
            ServiceMode::Minimal
        }
    }

    pub fn service_log_path(&self) -> Option<PathBuf> {
        self.log_dir.as_deref().map(service_log_path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bind.ip().is_loopback() {
            return Err(ConfigError::Settings(format!(
                "`bind` must be a loopback address, got `{}`",
                self.bind
            )));
        }
        require_absolute("inbox_dir", &self.inbox_dir)?;
        if let Some(log_dir) = &self.log_dir {
            require_absolute("log_dir", log_dir)?;
        }
        if let Some(training) = &self.training {
            require_absolute("training.root", &training.root)?;
            require_dir_name("training.sessions_dir_name", &training.sessions_dir_name)?;
            require_dir_name("training.runs_dir_name", &training.runs_dir_name)?;
            if training.sessions_dir_name == training.runs_dir_name {
                return Err(ConfigError::Settings(
                    "`training.sessions_dir_name` and `training.runs_dir_name` must differ"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn require_absolute(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        return Ok(());
    }
    Err(ConfigError::Settings(format!(
        "`{field}` must be an absolute path, got `{}`",
        path.display()
    )))
}

fn require_dir_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Settings(format!(
            "`{field}` must be a single directory name, got `{value}`"
        ))),
    }
}
