//! Logging: global tracing subscriber setup plus the [`Logger`] handle each component carries.
//!
//! The subscriber is installed once by the binary. Components never reach for a process-wide
//! logger; they receive a [`Logger`] that knows its name and whether info lines are wanted.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Installs the global tracing subscriber.
///
/// Level comes from `RUST_LOG` (default `info`). When `log_file_path` is set, the same fmt
/// output is written to stdout and appended to that file.
/// Load `.env` (e.g. `dotenvy::dotenv()`) before calling, otherwise `RUST_LOG` is not seen.
pub fn init_tracing(log_file_path: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let base = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    let registry = Registry::default().with(env_filter);

    let result = match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file = Arc::new(file);
            use tracing_subscriber::fmt::writer::MakeWriterExt;
            registry
                .with(base.with_writer(io::stdout.and(file)))
                .try_init()
        }
        None => registry.with(base.with_writer(io::stdout)).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}

/// Named, leveled logger handed to each component.
///
/// Info and debug lines honour `log_info`; warnings and errors are always emitted.
#[derive(Debug, Clone)]
pub struct Logger {
    name: Arc<str>,
    log_info: bool,
}

impl Logger {
    pub fn new(name: &str, log_info: bool) -> Self {
        Self {
            name: Arc::from(name),
            log_info,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log_info(&self) -> bool {
        self.log_info
    }

    pub fn debug(&self, message: &str) {
        if self.log_info {
            tracing::debug!(logger = %self.name, "{}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.log_info {
            tracing::info!(logger = %self.name, "{}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(logger = %self.name, "{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!(logger = %self.name, "{}", message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("Burger Client", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_logger_keeps_name() {
        let logger = Logger::new("Permission Sync", false);
        assert_eq!(logger.name(), "Permission Sync");
        assert!(!logger.log_info());
    }

    #[test]
    fn test_default_logger_is_verbose() {
        let logger = Logger::default();
        assert_eq!(logger.name(), "Burger Client");
        assert!(logger.log_info());
    }
}
