/// Failures of a save request. `InvalidRequest` is the caller's fault; every
/// other variant is a filesystem or encoding failure on our side.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode json for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SaveError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// Outcome codes of the today's-session lookup. The `Display` form is the
/// `status_code` string returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodaySessionError {
    #[error("NO_SESSION_FOR_TODAY")]
    NoSessionForToday,
    #[error("INVALID_SESSION_FILE: {0}")]
    InvalidFile(String),
    #[error("INVALID_SESSION_CONTRACT: {0}")]
    InvalidContract(String),
}

impl TodaySessionError {
    pub fn status_code(&self) -> String {
        self.to_string()
    }
}
