use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Body of the `POST` that triggers the NPS update.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateRequest<'a> {
    pub user_password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_elements: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl UpdateResponse {
    pub fn completed(n_elements: Option<u64>) -> Self {
        Self {
            done: true,
            n_elements,
            error: None,
        }
    }

    pub fn reports_invalid_credential(&self) -> bool {
        self.error.is_some_and(ErrorCode::is_invalid_credential)
    }
}
