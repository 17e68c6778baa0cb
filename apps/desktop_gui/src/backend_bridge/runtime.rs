//! Runtime bridge between UI command queue and the update controller.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    ClientSettings, HttpUpdateService, SessionSnapshot, UpdateController, UserIntent,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::{mpsc, watch};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

const SNAPSHOT_RETRY_DELAY: Duration = Duration::from_millis(25);

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Iniciando proceso de fondo...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                report_startup_failure(&ui_tx, format!("failed to build backend runtime: {err}"));
                return;
            }
        };

        runtime.block_on(run_backend(cmd_rx, ui_tx, settings));
    });
}

fn report_startup_failure(ui_tx: &Sender<UiEvent>, message: String) {
    tracing::error!("backend worker startup failure: {message}");
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(message)));
}

async fn run_backend(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) {
    let endpoint = match settings.endpoint() {
        Ok(endpoint) => endpoint,
        Err(err) => {
            report_startup_failure(&ui_tx, err.to_string());
            return;
        }
    };
    let timing = settings.timing();
    let service = match HttpUpdateService::new(endpoint, timing.request_timeout) {
        Ok(service) => service,
        Err(err) => {
            report_startup_failure(&ui_tx, format!("failed to build http client: {err}"));
            return;
        }
    };
    tracing::info!(endpoint = %service.endpoint(), ?timing, "update endpoint configured");

    let controller = UpdateController::new(Arc::new(service), timing);
    let snapshots = controller.subscribe();
    let (intent_tx, intent_rx) = mpsc::unbounded_channel::<UserIntent>();

    tokio::spawn(forward_snapshots(snapshots, ui_tx.clone()));

    // crossbeam receivers block, so the forwarding loop lives on the blocking pool.
    tokio::task::spawn_blocking(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            tracing::debug!(command = cmd.name(), "forwarding command to update controller");
            if intent_tx.send(cmd.into()).is_err() {
                break;
            }
        }
    });

    let _ = ui_tx.try_send(UiEvent::Info(String::new()));
    controller.run(intent_rx).await;
}

/// Pushes the latest session snapshot to the UI queue. A snapshot that finds
/// the queue full is retried with whatever is newest, so the UI never stalls
/// on a stale phase.
pub(crate) async fn forward_snapshots(
    mut snapshots: watch::Receiver<SessionSnapshot>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        match ui_tx.try_send(UiEvent::Snapshot(snapshot)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("ui event queue full; retrying session snapshot");
                tokio::time::sleep(SNAPSHOT_RETRY_DELAY).await;
                continue;
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}
