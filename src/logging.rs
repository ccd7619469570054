//! Tracing setup.
//!
//! CLI runs log to stderr. The TUI owns the terminal, so it only logs when a
//! log file is configured.

use crate::config::LogConfig;
use anyhow::Result;
use std::fs;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Overrides `[log] level` when set
pub const LOG_ENV_VAR: &str = "URLGIST_LOG";

/// Where log output may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Terminal is busy; file only
    FileOnly,
}

pub fn init(config: &LogConfig, target: LogTarget) -> Result<()> {
    let writer = match (&config.file, target) {
        (Some(path), _) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (None, LogTarget::Stderr) => BoxMakeWriter::new(std::io::stderr),
        (None, LogTarget::FileOnly) => return Ok(()),
    };

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(config.file.is_none())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!("logging initialized");
    Ok(())
}
