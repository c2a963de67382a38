pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::{
    load_settings, load_settings_from, settings_file_path, SettingsEnv, BIND_ENV, INBOX_DIR_ENV,
    LOG_DIR_ENV, TRAINING_ROOT_ENV,
};
pub use paths::{
    default_state_root, CONFIG_PATH_ENV, DEFAULT_PORT, DEFAULT_RUNS_DIR_NAME,
    DEFAULT_SESSIONS_DIR_NAME, GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR, LATEST_RUN_FILE_NAME,
};
pub use settings::{ServiceMode, Settings, TrainingSettings};
