//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the VIP transfer client.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{TransferError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard must be kept alive for the file appender to flush.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.level))
        .map_err(|e| TransferError::Config(format!("Invalid log filter: {}", e)))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "vip-transfer.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TransferError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a mutation an operator performed through a view
pub fn log_user_action(user_id: Option<&str>, action: &str, target: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        target = target,
        "User action performed"
    );
}

/// Log a driver-side transfer status change
pub fn log_transfer_transition(transfer_id: &str, from: &str, to: &str) {
    info!(
        transfer_id = transfer_id,
        from = from,
        to = to,
        "Transfer status changed"
    );
}

/// Log a refresh that failed in the background and was swallowed
pub fn log_poll_failure(resource: &str, error: &TransferError) {
    warn!(
        resource = resource,
        error = %error,
        "Background refresh failed"
    );
}

/// Log API errors with context
pub fn log_api_error(endpoint: &str, error: &TransferError) {
    if error.is_recoverable() {
        warn!(endpoint = endpoint, error = %error, "API error occurred");
    } else {
        error!(endpoint = endpoint, error = %error, "API error occurred");
    }
}

/// Log request timing
pub fn log_request(method: &str, endpoint: &str, status: u16, duration_ms: u64) {
    debug!(
        method = method,
        endpoint = endpoint,
        status = status,
        duration_ms = duration_ms,
        "API request completed"
    );
}
