use serde::{Deserialize, Serialize};

/// Shortest password the client will forward to the update endpoint.
pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    AwaitingPassword,
    InFlight,
    Success,
    InvalidPassword,
    Error,
}

impl Phase {
    /// Terminal phases wait for the user to acknowledge the result.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Success | Phase::InvalidPassword | Phase::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingPassword => "awaiting_password",
            Phase::InFlight => "in_flight",
            Phase::Success => "success",
            Phase::InvalidPassword => "invalid_password",
            Phase::Error => "error",
        }
    }
}

pub fn password_meets_minimum(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
