use std::{pin::Pin, sync::Arc, time::Duration};

use shared::domain::Phase;
use tokio::{
    sync::{mpsc, watch},
    time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep},
};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::{
    error::{ServiceError, UpdateError},
    jokes::JokeBook,
    service::{RemoteUpdateService, ServiceReply},
    session::{SessionSnapshot, SessionState},
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(200);
pub const DEFAULT_JOKE_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_NOTICE_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerTiming {
    pub request_timeout: Duration,
    pub joke_interval: Duration,
    pub notice_interval: Duration,
    /// How long the "still working" notice stays up after each firing.
    pub notice_duration: Duration,
}

impl Default for ControllerTiming {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            joke_interval: DEFAULT_JOKE_INTERVAL,
            notice_interval: DEFAULT_NOTICE_INTERVAL,
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }
}

impl ControllerTiming {
    /// Zero periods fall back to the defaults, and the notice always hides
    /// before the next firing.
    pub fn normalized(self) -> Self {
        let or_default = |value: Duration, default: Duration| {
            if value.is_zero() {
                default
            } else {
                value
            }
        };
        let notice_interval = or_default(self.notice_interval, DEFAULT_NOTICE_INTERVAL);
        let mut notice_duration = or_default(self.notice_duration, DEFAULT_NOTICE_DURATION);
        if notice_duration >= notice_interval {
            notice_duration = notice_interval / 2;
        }

        Self {
            request_timeout: or_default(self.request_timeout, DEFAULT_REQUEST_TIMEOUT),
            joke_interval: or_default(self.joke_interval, DEFAULT_JOKE_INTERVAL),
            notice_interval,
            notice_duration,
        }
    }
}

/// Intents emitted by the presentation layer.
pub enum UserIntent {
    Start,
    Submit(Zeroizing<String>),
    Cancel,
    Acknowledge,
}

impl UserIntent {
    pub fn name(&self) -> &'static str {
        match self {
            UserIntent::Start => "start",
            UserIntent::Submit(_) => "submit",
            UserIntent::Cancel => "cancel",
            UserIntent::Acknowledge => "acknowledge",
        }
    }
}

impl std::fmt::Debug for UserIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Completed { elements: Option<u64> },
    InvalidCredential,
    Failed(ServiceError),
}

impl UpdateOutcome {
    pub fn phase(&self) -> Phase {
        match self {
            UpdateOutcome::Completed { .. } => Phase::Success,
            UpdateOutcome::InvalidCredential => Phase::InvalidPassword,
            UpdateOutcome::Failed(_) => Phase::Error,
        }
    }
}

/// Maps a settled request onto the outcome that decides the terminal phase.
///
/// The invalid-password code wins over both the status and the `done` flag.
pub fn interpret_reply(result: Result<ServiceReply, ServiceError>) -> UpdateOutcome {
    match result {
        Ok(reply) if reply.body.reports_invalid_credential() => UpdateOutcome::InvalidCredential,
        Ok(reply) if reply.body.done && reply.is_success() => UpdateOutcome::Completed {
            elements: reply.body.n_elements,
        },
        Ok(reply) => UpdateOutcome::Failed(ServiceError::NotCompleted {
            status: reply.status,
        }),
        Err(err) => UpdateOutcome::Failed(err),
    }
}

/// Cosmetic timers that live exactly as long as one in-flight request.
struct InFlightTimers {
    joke: Interval,
    notice: Interval,
    notice_hide: Pin<Box<Sleep>>,
    notice_hide_armed: bool,
    notice_duration: Duration,
}

impl InFlightTimers {
    fn start(timing: &ControllerTiming) -> Self {
        let now = Instant::now();
        let mut joke = interval_at(now + timing.joke_interval, timing.joke_interval);
        joke.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut notice = interval_at(now + timing.notice_interval, timing.notice_interval);
        notice.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            joke,
            notice,
            notice_hide: Box::pin(sleep(timing.notice_duration)),
            notice_hide_armed: false,
            notice_duration: timing.notice_duration,
        }
    }

    fn arm_notice_hide(&mut self) {
        self.notice_hide
            .as_mut()
            .reset(Instant::now() + self.notice_duration);
        self.notice_hide_armed = true;
    }

    /// Tears every timer down; nothing scheduled here can fire afterwards.
    fn settle(self) {
        debug!("in-flight timers cancelled");
    }
}

async fn next_intent(
    intents: &mut Option<&mut mpsc::UnboundedReceiver<UserIntent>>,
) -> Option<UserIntent> {
    match intents {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub struct UpdateController {
    service: Arc<dyn RemoteUpdateService>,
    jokes: JokeBook,
    timing: ControllerTiming,
    session: SessionState,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl UpdateController {
    pub fn new(service: Arc<dyn RemoteUpdateService>, timing: ControllerTiming) -> Self {
        Self::with_jokes(service, JokeBook::default(), timing)
    }

    pub fn with_jokes(
        service: Arc<dyn RemoteUpdateService>,
        jokes: JokeBook,
        timing: ControllerTiming,
    ) -> Self {
        let session = SessionState::default();
        let (snapshots, _) = watch::channel(session.snapshot(&jokes));
        Self {
            service,
            jokes,
            timing: timing.normalized(),
            session,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn jokes(&self) -> &JokeBook {
        &self.jokes
    }

    pub fn timing(&self) -> ControllerTiming {
        self.timing
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(&self.jokes)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    pub fn start(&mut self) -> Result<(), UpdateError> {
        self.session.start()?;
        self.publish();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), UpdateError> {
        self.session.cancel()?;
        self.publish();
        Ok(())
    }

    pub fn acknowledge(&mut self) -> Result<Phase, UpdateError> {
        let phase = self.session.acknowledge()?;
        self.publish();
        Ok(phase)
    }

    /// Sends one update request and drives the in-flight timers until it
    /// settles. Returns the terminal phase.
    pub async fn submit_update(&mut self, password: impl Into<String>) -> Result<Phase, UpdateError> {
        self.submit_with_intents(password.into(), None).await
    }

    /// Applies intents until the channel closes, publishing a snapshot after
    /// every change.
    pub async fn run(mut self, mut intents: mpsc::UnboundedReceiver<UserIntent>) {
        info!("update controller started");
        self.publish();
        while let Some(intent) = intents.recv().await {
            let name = intent.name();
            match self.dispatch(intent, Some(&mut intents)).await {
                Ok(()) => {}
                Err(err @ UpdateError::PasswordTooShort { .. }) => {
                    debug!(%err, "password rejected locally");
                }
                Err(err) => warn!(intent = name, %err, "ignoring user intent"),
            }
        }
        info!("intent channel closed; update controller stopping");
    }

    async fn dispatch(
        &mut self,
        intent: UserIntent,
        intents: Option<&mut mpsc::UnboundedReceiver<UserIntent>>,
    ) -> Result<(), UpdateError> {
        match intent {
            UserIntent::Start => self.start(),
            UserIntent::Cancel => self.cancel(),
            UserIntent::Acknowledge => self.acknowledge().map(|_| ()),
            UserIntent::Submit(mut password) => self
                .submit_with_intents(std::mem::take(&mut *password), intents)
                .await
                .map(|_| ()),
        }
    }

    async fn submit_with_intents(
        &mut self,
        password: String,
        intents: Option<&mut mpsc::UnboundedReceiver<UserIntent>>,
    ) -> Result<Phase, UpdateError> {
        if let Err(err) = self.session.begin_submit(password) {
            self.publish();
            return Err(err);
        }
        let password = Zeroizing::new(self.session.password().to_owned());
        self.publish();
        info!(timeout = ?self.timing.request_timeout, "submitting NPS update");
        Ok(self.drive_in_flight(password, intents).await)
    }

    async fn drive_in_flight(
        &mut self,
        password: Zeroizing<String>,
        mut intents: Option<&mut mpsc::UnboundedReceiver<UserIntent>>,
    ) -> Phase {
        let service = Arc::clone(&self.service);
        let request_timeout = self.timing.request_timeout;
        let request = async move {
            match tokio::time::timeout(request_timeout, service.trigger_update(&password)).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::Timeout(request_timeout)),
            }
        };
        tokio::pin!(request);

        let mut timers = InFlightTimers::start(&self.timing);
        let outcome = loop {
            tokio::select! {
                biased;
                result = &mut request => break interpret_reply(result),
                _ = timers.joke.tick() => {
                    if self.session.advance_joke(&self.jokes) {
                        debug!(index = self.session.joke_index(), "rotating joke");
                        self.publish();
                    }
                }
                _ = timers.notice.tick() => {
                    timers.arm_notice_hide();
                    if self.session.set_notice_visible(true) {
                        debug!("showing still-working notice");
                        self.publish();
                    }
                }
                () = &mut timers.notice_hide, if timers.notice_hide_armed => {
                    timers.notice_hide_armed = false;
                    if self.session.set_notice_visible(false) {
                        self.publish();
                    }
                }
                intent = next_intent(&mut intents), if intents.is_some() => match intent {
                    Some(intent) => {
                        debug!(intent = intent.name(), "dropping intent while update is in flight");
                    }
                    None => intents = None,
                },
            }
        };

        timers.settle();
        match &outcome {
            UpdateOutcome::Completed { elements } => {
                info!(?elements, "NPS update completed");
            }
            UpdateOutcome::InvalidCredential => warn!("update endpoint rejected the password"),
            UpdateOutcome::Failed(err) => warn!(%err, "NPS update failed"),
        }
        let phase = match self.session.settle(&outcome) {
            Ok(phase) => phase,
            Err(err) => {
                warn!(%err, "session left in-flight state before settlement");
                self.session.phase()
            }
        };
        self.publish();
        phase
    }
}
