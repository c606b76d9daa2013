use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::{FileLoggingConfig, LogFormat, LoggingConfig, LoggingRotation};

pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

/// Installs the global tracing subscriber. Keep the returned guard alive for
/// as long as file logging should flush.
pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    if logging_config.filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }

    let stderr_layer = if logging_config.stderr_enabled {
        let filter = build_env_filter(&logging_config.filter)?;
        let layer = match logging_config.format {
            LogFormat::Pretty => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_filter(filter)
                .boxed(),
        };
        Some(layer)
    } else {
        None
    };

    let mut worker_guard = None;
    let file_layer = match &logging_config.file {
        Some(file_config) => {
            let appender = build_rolling_appender(file_config)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            worker_guard = Some(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(build_env_filter(&logging_config.filter)?),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        filter = %logging_config.filter,
        format = ?logging_config.format,
        file_enabled = logging_config.file.is_some(),
        stderr_enabled = logging_config.stderr_enabled,
        "logging_initialized"
    );

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .with_context(|| format!("failed to parse logging.filter '{}'", filter))
}

fn build_rolling_appender(file_config: &FileLoggingConfig) -> Result<RollingFileAppender> {
    if file_config.prefix.trim().is_empty() {
        return Err(anyhow!("logging.file.prefix cannot be empty"));
    }

    let log_dir = resolve_log_dir(&file_config.dir)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create logging directory {}", log_dir.display()))?;

    Ok(match file_config.rotation {
        LoggingRotation::Daily => rolling::daily(&log_dir, &file_config.prefix),
        LoggingRotation::Hourly => rolling::hourly(&log_dir, &file_config.prefix),
    })
}

fn resolve_log_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(anyhow!("logging.file.dir cannot be empty"));
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    Ok(std::env::current_dir()
        .context("failed to read current working directory for logging.file.dir resolution")?
        .join(dir))
}
