#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! The terminal belongs to the form, so logs only go to a file. Without a
//! log file no subscriber is installed and every `tracing` macro is a no-op.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where and how to write logs.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig<'a> {
    /// Append logs to this file. `None` disables logging.
    pub file: Option<&'a Path>,
    /// `EnvFilter` directives, e.g. `info` or `cardform_core=debug`.
    pub filter: &'a str,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

/// Install the global subscriber described by `config`.
///
/// Returns `Ok(false)` when logging is disabled.
///
/// # Errors
///
/// Fails if the log file cannot be opened, the filter does not parse, or a
/// global subscriber is already installed.
pub fn init(config: LogConfig<'_>) -> io::Result<bool> {
    let Some(path) = config.file else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(config.filter).map_err(io::Error::other)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let writer = Mutex::new(file);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(io::Error::other)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        filter = config.filter,
        json = config.json,
        "logging initialised"
    );
    Ok(true)
}
