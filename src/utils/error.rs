use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build request for {url}: {reason}")]
    RequestBuild { url: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Failure reported by an [`HttpTransport`](crate::domain::ports::HttpTransport).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{message}")]
    Failed {
        message: String,
        status: Option<u16>,
    },
}

impl TransportError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self::Failed {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Status code carried alongside the failure, if any. Informational only.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status().map(|s| s.as_u16()),
            Self::Failed { status, .. } => *status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Network,
    Decode,
    Configuration,
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RequestBuild { .. } => ErrorCategory::Request,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Io(_) | Self::ConfigError { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Request => "Check the base URL and the username",
            ErrorCategory::Network => "Check network connectivity and try again",
            // 404 等錯誤回應的 body 是物件而非陣列，也會落在這裡
            ErrorCategory::Decode => {
                "The API did not return a list of repositories; check that the user exists"
            }
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
