#![deny(missing_docs)]

//! Core library for the docquery client.

/// Command-line parsing and dispatch.
pub mod cli;
/// Environment-driven configuration management.
pub mod config;
/// Terminal view and interactive shell.
pub mod console;
/// Upload and query submission handlers.
pub mod handlers;
/// Structured logging and tracing setup.
pub mod logging;
/// Session counters.
pub mod metrics;
/// Answer rendering.
pub mod render;
/// File selection and directory expansion.
pub mod selection;
/// HTTP transport to the document server.
pub mod transport;
/// Form element models and view traits.
pub mod ui;
