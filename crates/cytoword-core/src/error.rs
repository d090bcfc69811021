use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CytowordError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureKind {
    Transient,
    Schema,
    Fatal,
}

impl FetchFailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Schema => "schema",
            Self::Fatal => "fatal",
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transient | Self::Schema)
    }
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CytowordError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("nothing to process: {0}")]
    Parse(String),

    #[error("query failed ({kind}) after {attempts} attempt(s): {message}")]
    Fetch {
        kind: FetchFailureKind,
        attempts: u32,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl CytowordError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Fetch { .. } => "FETCH_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    /// Single-attempt transport failure; the retry loop fills in the final count.
    pub fn fetch(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            attempts: 1,
            message: message.into(),
        }
    }

    /// Transports report every request failure as [`Self::Fetch`]; anything
    /// else is outside the retry policy.
    pub(crate) fn fetch_kind(&self) -> Option<FetchFailureKind> {
        match self {
            Self::Fetch { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub fn fetch_status_kind(status: reqwest::StatusCode) -> FetchFailureKind {
    if status.is_server_error() || matches!(status.as_u16(), 408 | 429) {
        FetchFailureKind::Transient
    } else {
        FetchFailureKind::Fatal
    }
}
