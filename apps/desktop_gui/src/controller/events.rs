//! UI/backend events and error modeling for the desktop controller.

use client_core::SessionSnapshot;

pub enum UiEvent {
    Info(String),
    Snapshot(SessionSnapshot),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Runtime,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("update endpoint")
            || message_lower.contains("api_url")
            || message_lower.contains("settings file")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("runtime") || message_lower.contains("http client") {
            UiErrorCategory::Runtime
        } else {
            UiErrorCategory::Unknown
        };

        Self { category, message }
    }

    pub fn user_message(&self) -> String {
        match self.category {
            UiErrorCategory::Configuration => format!(
                "Configuración inválida: {}. Define NPS_UPDATER_API_URL o usa --api-url.",
                self.message
            ),
            UiErrorCategory::Runtime => {
                format!("No se pudo iniciar el proceso de fondo: {}", self.message)
            }
            UiErrorCategory::Unknown => self.message.clone(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
