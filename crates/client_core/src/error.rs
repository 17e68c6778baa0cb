use std::time::Duration;

use shared::domain::Phase;
use thiserror::Error;

/// Rejections raised by the controller before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("password must have at least {min} characters (got {actual})")]
    PasswordTooShort { min: usize, actual: usize },
    #[error("{intent} is not accepted while {}", .phase.label())]
    InvalidTransition { intent: &'static str, phase: Phase },
}

/// Every way the update endpoint can fail to confirm completion.
///
/// All variants end in the generic error phase; the distinction only reaches
/// the logs.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("update endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("update endpoint did not answer within {0:?}")]
    Timeout(Duration),
    #[error("update endpoint returned a malformed payload (status {status}): {source}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("update endpoint did not report completion (status {status})")]
    NotCompleted { status: u16 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no update endpoint configured; set NPS_UPDATER_API_URL or pass --api-url")]
    MissingApiUrl,
    #[error("update endpoint '{value}' is not a valid URL: {source}")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("update endpoint '{value}' must use http or https")]
    UnsupportedScheme { value: String },
}
