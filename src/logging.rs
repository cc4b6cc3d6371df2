//! Log file setup for the `passvault` binary.
//!
//! Events from the library go to `<store>/.log` through a non-blocking
//! writer.  The filter comes from `PASSVAULT_LOG` (default `info`).
//! Nothing here ever logs passwords or plaintext.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::{PassVaultError, Result};
use crate::vault::fs_ops::restrict_permissions;

/// Log file name inside the store root.
pub const LOG_FILE: &str = ".log";

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "PASSVAULT_LOG";

/// Install the global subscriber.  Keep the returned guard alive until
/// the process exits so buffered lines are flushed.
pub fn init(store_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(store_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(store_dir)
        .map_err(|e| PassVaultError::ConfigError(format!("cannot open log file: {e}")))?;
    restrict_permissions(&store_dir.join(LOG_FILE));

    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| PassVaultError::ConfigError(format!("cannot install logger: {e}")))?;

    Ok(guard)
}
