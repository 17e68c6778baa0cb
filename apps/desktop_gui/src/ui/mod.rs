//! UI layer for the desktop window.

pub mod app;

pub use app::NpsUpdaterApp;
