use serde::Serialize;
use std::fmt;

/// Why one analysis attempt failed. Every variant ends the attempt with
/// `SessionState::Failed`; none of them is fatal to the application.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Upload failed: {reason}{}", detail_suffix(.detail))]
    Service {
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    /// The body was not the JSON document the service promises, or it was
    /// outside the agreed value ranges.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnalysisError::MalformedResponse(err.to_string())
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(err.to_string())
    }
}

/// Error handed to front ends by the command layer.
#[derive(Debug, Serialize)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError { message: msg }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            message: msg.to_string(),
        }
    }
}
