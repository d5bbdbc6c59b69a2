//! Subscriber initialization

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::{LogConfig, DEFAULT_LOG_LEVEL, LOG_FILE_NAME};
use crate::core::error::AppError;

/// Keeps the non-blocking writers alive. Dropping it flushes them.
#[must_use = "dropping the guard stops log output"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Install the global subscriber and the panic hook.
///
/// Fails if a subscriber is already installed or the log directory cannot
/// be created.
pub fn init(config: &LogConfig) -> Result<LogGuard, AppError> {
    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?} ({}), using {}", config.log_level, e, DEFAULT_LOG_LEVEL);
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    let mut guards = Vec::new();

    let (stderr, guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(guard);
    let text_layer = (!config.json).then(|| fmt::layer().with_writer(stderr.clone()).with_target(true));
    let json_layer = config.json.then(|| fmt::layer().json().with_writer(stderr).with_current_span(false));

    let file_layer = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::Config(format!("Failed to create log directory {}: {}", dir.display(), e))
            })?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_NAME));
            guards.push(guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to install log subscriber: {}", e)))?;

    setup_panic_hook();

    tracing::debug!(
        log_level = %config.log_level,
        log_dir = ?config.log_dir,
        json = config.json,
        "Logging initialized"
    );

    Ok(LogGuard { _guards: guards })
}

/// Log panics through `tracing`, then defer to the previous hook.
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(location = %location, message = %message, "Panic");
        default_panic(panic_info);
    }));
}
