use serde::{Deserialize, Serialize};

/// Error codes the update endpoint may place in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPassword,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn is_invalid_credential(self) -> bool {
        self == ErrorCode::InvalidPassword
    }
}
