//! Backend commands queued from UI to backend worker.

use client_core::UserIntent;
use zeroize::Zeroizing;

pub enum BackendCommand {
    Start,
    Submit { password: Zeroizing<String> },
    Cancel,
    Acknowledge,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Start => "start",
            BackendCommand::Submit { .. } => "submit",
            BackendCommand::Cancel => "cancel",
            BackendCommand::Acknowledge => "acknowledge",
        }
    }
}

impl From<BackendCommand> for UserIntent {
    fn from(value: BackendCommand) -> Self {
        match value {
            BackendCommand::Start => UserIntent::Start,
            BackendCommand::Submit { password } => UserIntent::Submit(password),
            BackendCommand::Cancel => UserIntent::Cancel,
            BackendCommand::Acknowledge => UserIntent::Acknowledge,
        }
    }
}
