//! # Logger
//!
//! Installs the global `tracing` subscriber from the `logging` section of the
//! engine configuration.
//!
//! Console output always goes to **stderr**, keeping stdout free for command
//! output. A configured directory adds daily rolling files written by a
//! non-blocking worker, as text or JSON lines. `RUST_LOG` overrides the
//! configured directive when it is set.
//!
//! ```rust,no_run
//! # use phub_domain::config::LoggingConfig;
//! # use phub_logger::Logger;
//! let _logger = Logger::from_config("phub", &LoggingConfig::default()).unwrap();
//! tracing::info!("Engine ready");
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};

use phub_domain::config::LoggingConfig;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 14;

/// Handle on the installed subscriber.
///
/// Owns the file worker, so file output stops once it is dropped.
#[must_use = "Dropping this handle stops file logging."]
#[derive(Debug)]
pub struct Logger {
    file_worker: Option<WorkerGuard>,
}

impl Logger {
    /// Installs the global subscriber.
    ///
    /// `name` prefixes the log files. Settings are checked before anything
    /// global is touched.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for a blank name or an unparsable
    ///   `level` directive.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory
    ///   cannot be prepared.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already set.
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("logger name cannot be empty"));
        }
        let filter = filter_for(config)?;

        let (file_layer, file_worker) = match &config.directory {
            Some(dir) => {
                let (writer, worker) = file_writer(name, dir)?;
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                let layer = if config.json { layer.json().boxed() } else { layer.boxed() };
                (Some(layer), Some(worker))
            },
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .with(file_layer)
            .try_init()?;

        tracing::debug!(name, files = file_worker.is_some(), json = config.json, "Logging initialized");
        Ok(Self { file_worker })
    }

    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.file_worker.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.file_worker.is_some() {
            tracing::info!("Logging shutting down, flushing files");
        }
    }
}

/// The configured directive, unless `RUST_LOG` is set.
///
/// The configured directive is parsed either way so a typo never goes unnoticed.
fn filter_for(config: &LoggingConfig) -> Result<EnvFilter, LoggerError> {
    let level = config.level.trim();
    if level.is_empty() {
        return Err(invalid("level directive cannot be empty"));
    }
    let configured = EnvFilter::try_new(level)
        .map_err(|e| invalid(format!("invalid level directive '{level}': {e}")))?;

    Ok(match std::env::var_os(EnvFilter::DEFAULT_ENV) {
        Some(_) => EnvFilter::from_default_env(),
        None => configured,
    })
}

/// Daily rolling files under `dir`, written by a background worker.
fn file_writer(name: &str, dir: &Path) -> Result<(NonBlocking, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;

    Ok(tracing_appender::non_blocking(appender))
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}
