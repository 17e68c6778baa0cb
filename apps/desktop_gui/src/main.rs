use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::NpsUpdaterApp;

#[derive(Parser, Debug)]
#[command(name = "nps-updater", about = "Trigger the remote NPS update")]
struct Args {
    /// Update endpoint; overrides the settings file and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file (defaults to ./nps_updater.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = Some(api_url);
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Actualizador NPS")
            .with_inner_size([520.0, 480.0])
            .with_min_inner_size([420.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Actualizador NPS",
        options,
        Box::new(move |_cc| Ok(Box::new(NpsUpdaterApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use client_core::{SessionSnapshot, UserIntent};
    use crossbeam_channel::bounded;
    use shared::domain::Phase;
    use tokio::sync::watch;
    use zeroize::Zeroizing;

    use super::{Args, BackendCommand, UiEvent};
    use crate::backend_bridge::runtime::forward_snapshots;
    use crate::controller::{events::UiError, orchestration::dispatch_backend_command};
    use clap::Parser;

    #[test]
    fn submit_command_carries_password_into_intent() {
        let cmd = BackendCommand::Submit {
            password: Zeroizing::new("s3cret".to_string()),
        };
        assert_eq!(cmd.name(), "submit");
        match UserIntent::from(cmd) {
            UserIntent::Submit(password) => assert_eq!(password.as_str(), "s3cret"),
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn full_command_queue_reports_retry_status() {
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();

        dispatch_backend_command(&cmd_tx, BackendCommand::Start, &mut status);
        assert!(status.is_empty());

        dispatch_backend_command(&cmd_tx, BackendCommand::Cancel, &mut status);
        assert!(status.contains("llena"));
    }

    #[test]
    fn disconnected_backend_reports_restart_status() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        drop(cmd_rx);
        let mut status = String::new();

        dispatch_backend_command(&cmd_tx, BackendCommand::Acknowledge, &mut status);
        assert!(status.contains("reinicia"));
    }

    #[test]
    fn classifies_missing_endpoint_as_configuration_error() {
        let err = UiError::from_message(
            "no update endpoint configured; set NPS_UPDATER_API_URL or pass --api-url",
        );
        assert!(err.user_message().starts_with("Configuración inválida"));

        let err = UiError::from_message("failed to build backend runtime: too many files");
        assert!(err.user_message().starts_with("No se pudo iniciar"));

        let err = UiError::from_message("something odd");
        assert_eq!(err.user_message(), "something odd");
    }

    #[test]
    fn cli_accepts_endpoint_override() {
        let args = Args::try_parse_from([
            "nps-updater",
            "--api-url",
            "https://nps.example.com/update",
        ])
        .expect("parse args");
        assert_eq!(
            args.api_url.as_deref(),
            Some("https://nps.example.com/update")
        );
        assert_eq!(args.log_filter, "info");
        assert!(args.config.is_none());
    }

    #[tokio::test]
    async fn snapshot_dropped_on_full_queue_is_resent() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        ui_tx
            .try_send(UiEvent::Info("busy".to_string()))
            .expect("fill queue");
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());
        let forwarder = tokio::spawn(forward_snapshots(snapshot_rx, ui_tx));

        snapshot_tx.send_replace(SessionSnapshot {
            phase: Phase::Success,
            result_metadata: Some(1234),
            ..SessionSnapshot::default()
        });
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Info(_))));

        let mut delivered = None;
        for _ in 0..100 {
            if let Ok(UiEvent::Snapshot(snapshot)) = ui_rx.try_recv() {
                delivered = Some(snapshot);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let delivered = delivered.expect("snapshot resent after queue drained");
        assert_eq!(delivered.phase, Phase::Success);
        assert_eq!(delivered.result_metadata, Some(1234));

        drop(snapshot_tx);
        forwarder.await.expect("forwarder task");
    }
}
