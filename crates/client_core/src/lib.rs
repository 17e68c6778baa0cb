//! Client side of the NPS updater: password gating, the in-flight request
//! with its cosmetic timers, and the mapping of the endpoint's answer onto a
//! terminal phase.

pub mod config;
pub mod controller;
pub mod error;
pub mod jokes;
pub mod service;
pub mod session;

pub use config::{load_settings, ClientSettings};
pub use controller::{interpret_reply, ControllerTiming, UpdateController, UpdateOutcome, UserIntent};
pub use error::{ConfigError, ServiceError, UpdateError};
pub use jokes::JokeBook;
pub use service::{HttpUpdateService, RemoteUpdateService, ServiceReply};
pub use session::{SessionSnapshot, SessionState};

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod service_tests;
