//! Structured logging setup.
//!
//! The library only emits [`tracing`] events. Binaries, tests and benches that
//! want to see them call [`init_logging`] once.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use anyhow::{Context, Result, bail};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(format: &str) -> Result<Self> {
        if format.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if format.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            bail!("Invalid OPTIM_LOG_FORMAT '{}' (expected 'json' or 'pretty')", format)
        }
    }
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).with_context(|| format!("Invalid log filter '{}'", level))
    }
}

fn open_log_file(path: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path))
}

/// Install a global subscriber
///
/// When `level` is `None` the filter comes from `OPTIM_TRACE`, defaulting to
/// `off`. `OPTIM_LOG_FORMAT` selects `pretty` (default) or `json` output on
/// stderr, and `OPTIM_LOG_FILE` additionally appends to a file.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level = level
        .map(str::to_string)
        .or_else(|| env::var("OPTIM_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level)?;

    let format = LogFormat::parse(
        &env::var("OPTIM_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
    )?;
    let log_file = env::var("OPTIM_LOG_FILE")
        .ok()
        .map(|path| open_log_file(&path))
        .transpose()?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match (format, log_file) {
        (LogFormat::Json, Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).json())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
        (LogFormat::Json, None) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).json())
            .try_init(),
        (LogFormat::Pretty, Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).pretty())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .pretty(),
            )
            .try_init(),
        (LogFormat::Pretty, None) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).pretty())
            .try_init(),
    };

    // Lost a race with another initialiser
    Ok(installed.is_ok())
}
