//! Backend bridge: command queue types and the worker thread that hosts the controller.

pub mod commands;
pub mod runtime;
