use std::time::Duration;

use client_core::SessionSnapshot;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{password_meets_minimum, Phase};
use zeroize::{Zeroize, Zeroizing};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(217, 119, 6);

pub struct NpsUpdaterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: SessionSnapshot,
    password_input: String,
    status: String,
    startup_error: Option<UiError>,
    focus_password: bool,
}

impl NpsUpdaterApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: SessionSnapshot::default(),
            password_input: String::new(),
            status: String::new(),
            startup_error: None,
            focus_password: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::warn!(error = err.message(), "backend unavailable");
                    self.startup_error = Some(err);
                }
                UiEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot),
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        if snapshot.phase == Phase::AwaitingPassword && self.snapshot.phase != Phase::AwaitingPassword
        {
            self.focus_password = true;
        }
        if snapshot.phase != Phase::AwaitingPassword {
            self.password_input.zeroize();
        }
        self.snapshot = snapshot;
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn submit_password(&mut self) {
        let password = Zeroizing::new(std::mem::take(&mut self.password_input));
        self.send(BackendCommand::Submit { password });
    }

    fn show_status_banner(&self, ui: &mut egui::Ui) {
        if let Some(err) = &self.startup_error {
            ui.colored_label(ERROR_COLOR, err.user_message());
        } else if !self.status.is_empty() {
            ui.weak(&self.status);
        }
    }

    fn show_idle(&mut self, ui: &mut egui::Ui) {
        let enabled = self.startup_error.is_none();
        let button = egui::Button::new(egui::RichText::new("Actualizar bruto NPS").size(20.0))
            .min_size(egui::vec2(260.0, 48.0));
        if ui.add_enabled(enabled, button).clicked() {
            self.send(BackendCommand::Start);
        }
    }

    fn show_password_form(&mut self, ui: &mut egui::Ui) {
        ui.label("Introduce la contraseña para lanzar la actualización");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.password_input)
                .password(true)
                .hint_text("Contraseña")
                .desired_width(260.0),
        );
        if self.focus_password {
            response.request_focus();
            self.focus_password = false;
        }

        if let Some(err) = &self.snapshot.validation_error {
            ui.colored_label(WARNING_COLOR, err.to_string());
        }

        let can_submit = password_meets_minimum(&self.password_input);
        let pressed_enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.horizontal(|ui| {
            if ui
                .add_enabled(can_submit, egui::Button::new("Actualizar"))
                .clicked()
                || (can_submit && pressed_enter)
            {
                self.submit_password();
            }
            if ui.button("Cancelar").clicked() {
                self.password_input.zeroize();
                self.send(BackendCommand::Cancel);
            }
        });
    }

    fn show_in_flight(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Actualizando...").strong());
        });
        ui.add_space(12.0);

        if let Some(joke) = &self.snapshot.current_joke {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new("😄").size(22.0));
                    ui.label(egui::RichText::new(joke).italics());
                });
            });
        }

        ui.add_space(12.0);
        ui.weak("Procesando datos del NPS...");
        if self.snapshot.notice_visible {
            ui.colored_label(
                WARNING_COLOR,
                "Seguimos trabajando; la actualización puede tardar unos minutos.",
            );
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        let (icon, title, color, detail, action) = match self.snapshot.phase {
            Phase::Success => (
                "🎉",
                "¡Éxito!",
                SUCCESS_COLOR,
                "NPS actualizado correctamente".to_string(),
                "Continuar",
            ),
            Phase::InvalidPassword => (
                "🔒",
                "Contraseña incorrecta",
                WARNING_COLOR,
                "El servicio rechazó la contraseña".to_string(),
                "Reintentar",
            ),
            _ => (
                "❌",
                "Error",
                ERROR_COLOR,
                "Hubo un problema al actualizar el NPS".to_string(),
                "Reintentar",
            ),
        };

        ui.label(egui::RichText::new(icon).size(56.0));
        ui.label(egui::RichText::new(title).size(28.0).strong().color(color));
        ui.label(detail);
        if let Some(elements) = self.snapshot.result_metadata {
            ui.label(format!("Elementos procesados: {elements}"));
        }
        ui.add_space(12.0);
        if ui.button(action).clicked() {
            self.send(BackendCommand::Acknowledge);
        }
    }
}

impl eframe::App for NpsUpdaterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("Actualizador NPS").size(32.0));
                ui.add_space(16.0);

                match self.snapshot.phase {
                    phase if phase.is_terminal() => self.show_result(ui),
                    Phase::AwaitingPassword => self.show_password_form(ui),
                    Phase::InFlight => self.show_in_flight(ui),
                    _ => self.show_idle(ui),
                }

                ui.add_space(16.0);
                self.show_status_banner(ui);
            });
        });

        if self.snapshot.phase == Phase::InFlight {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
