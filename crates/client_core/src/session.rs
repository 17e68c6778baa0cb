//! The single session record and its transition functions.

use shared::domain::{password_meets_minimum, Phase, MIN_PASSWORD_LEN};
use zeroize::Zeroize;

use crate::{error::UpdateError, jokes::JokeBook, UpdateOutcome};

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_joke: Option<String>,
    pub notice_visible: bool,
    pub result_metadata: Option<u64>,
    pub validation_error: Option<UpdateError>,
}

#[derive(Default)]
pub struct SessionState {
    phase: Phase,
    password: String,
    joke_index: usize,
    result_metadata: Option<u64>,
    notice_visible: bool,
    validation_error: Option<UpdateError>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("phase", &self.phase)
            .field("password_set", &!self.password.is_empty())
            .field("joke_index", &self.joke_index)
            .field("result_metadata", &self.result_metadata)
            .field("notice_visible", &self.notice_visible)
            .field("validation_error", &self.validation_error)
            .finish()
    }
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn joke_index(&self) -> usize {
        self.joke_index
    }

    pub fn result_metadata(&self) -> Option<u64> {
        self.result_metadata
    }

    pub fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    pub fn validation_error(&self) -> Option<&UpdateError> {
        self.validation_error.as_ref()
    }

    pub fn snapshot(&self, jokes: &JokeBook) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_joke: (self.phase == Phase::InFlight)
                .then(|| jokes.get(self.joke_index).to_string()),
            notice_visible: self.notice_visible,
            result_metadata: self.result_metadata,
            validation_error: self.validation_error.clone(),
        }
    }

    fn expect_phase(&self, expected: Phase, intent: &'static str) -> Result<(), UpdateError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(UpdateError::InvalidTransition {
                intent,
                phase: self.phase,
            })
        }
    }

    fn clear_password(&mut self) {
        self.password.zeroize();
    }

    /// Idle -> AwaitingPassword.
    pub fn start(&mut self) -> Result<(), UpdateError> {
        self.expect_phase(Phase::Idle, "start")?;
        self.validation_error = None;
        self.phase = Phase::AwaitingPassword;
        Ok(())
    }

    /// AwaitingPassword -> Idle, dropping whatever was typed.
    pub fn cancel(&mut self) -> Result<(), UpdateError> {
        self.expect_phase(Phase::AwaitingPassword, "cancel")?;
        self.clear_password();
        self.validation_error = None;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// AwaitingPassword -> InFlight when the password is long enough.
    ///
    /// A short password is zeroized and recorded as the validation error; the
    /// phase does not change.
    pub fn begin_submit(&mut self, mut password: String) -> Result<(), UpdateError> {
        if let Err(err) = self.expect_phase(Phase::AwaitingPassword, "submit") {
            password.zeroize();
            return Err(err);
        }
        if !password_meets_minimum(&password) {
            let err = UpdateError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
                actual: password.chars().count(),
            };
            password.zeroize();
            self.validation_error = Some(err.clone());
            return Err(err);
        }

        self.clear_password();
        self.password = password;
        self.validation_error = None;
        self.result_metadata = None;
        self.notice_visible = false;
        self.joke_index = 0;
        self.phase = Phase::InFlight;
        Ok(())
    }

    /// Returns whether the index moved; nothing moves outside InFlight.
    pub fn advance_joke(&mut self, jokes: &JokeBook) -> bool {
        if self.phase != Phase::InFlight {
            return false;
        }
        self.joke_index = jokes.next_index(self.joke_index);
        true
    }

    pub fn set_notice_visible(&mut self, visible: bool) -> bool {
        if self.phase != Phase::InFlight || self.notice_visible == visible {
            return false;
        }
        self.notice_visible = visible;
        true
    }

    /// InFlight -> terminal phase. Callers must have torn down the in-flight
    /// timers before calling this.
    pub fn settle(&mut self, outcome: &UpdateOutcome) -> Result<Phase, UpdateError> {
        self.expect_phase(Phase::InFlight, "settle")?;
        self.clear_password();
        self.notice_visible = false;
        let phase = outcome.phase();
        self.result_metadata = match outcome {
            UpdateOutcome::Completed { elements } => *elements,
            _ => None,
        };
        self.phase = phase;
        Ok(phase)
    }

    /// Dismisses a result. An invalid password goes back to the form.
    pub fn acknowledge(&mut self) -> Result<Phase, UpdateError> {
        let next = match self.phase {
            Phase::Success | Phase::Error => Phase::Idle,
            Phase::InvalidPassword => Phase::AwaitingPassword,
            phase => {
                return Err(UpdateError::InvalidTransition {
                    intent: "acknowledge",
                    phase,
                })
            }
        };
        self.clear_password();
        self.result_metadata = None;
        self.validation_error = None;
        self.phase = next;
        Ok(next)
    }
}
