//! Structured JSONL logging for the folio portfolio shell
//!
//! # Features
//!
//! - **JSONL Output**: Structured JSON lines for console and files (default)
//! - **View Context**: Every span carries the mounted view and its session id
//! - **File Rotation**: Daily/hourly log rotation via tracing-appender
//! - **Presets**: development, production and testing configurations
//!
//! # Quick Start
//!
//! ```ignore
//! use folio_logging::{FolioSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! FolioSubscriberBuilder::new().init()?;
//!
//! // Pretty human-readable output
//! FolioSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```
//!
//! # View Context
//!
//! ```ignore
//! use folio_logging::ViewContextGuard;
//!
//! let _guard = ViewContextGuard::new("portfolio");
//! let _span = folio_logging::view_span().entered();
//!
//! // Logged with view = "portfolio" and the session id
//! tracing::info!("Page mounted");
//! ```

pub mod config;
pub mod context;
pub mod layers;

pub use config::{
    ConsoleConfig, ConsoleFormat, FileConfig, FilterConfig, JsonlConfig, LogConfig, RotationStrategy,
};
pub use context::{ViewContextData, ViewContextGuard};
pub use layers::{ViewContextExtension, ViewContextLayer, jsonl_layer, view_span};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::fs::{self, File};
use std::path::PathBuf;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid filter directives: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("invalid console level: {0}")]
    Level(String),

    #[error("cannot prepare log file in {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create rolling log appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Builder for configuring and installing the folio logging subscriber
///
/// By default, console output uses JSONL format. Use
/// [`LogConfig::development()`] for human-readable output.
#[derive(Debug, Clone, Default)]
pub struct FolioSubscriberBuilder {
    config: LogConfig,
}

impl FolioSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes file output when dropped; keep it alive
    /// for the life of the program.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.config.filter_directives())?,
        };

        let console = &self.config.console;
        let console_level = match console.level.as_deref() {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| LoggingError::Level(level.to_string()))?,
            None => LevelFilter::TRACE,
        };

        let (file_writer, guard) = match &self.config.file {
            Some(file_config) => {
                let (writer, guard) = create_file_writer(file_config)?;
                (Some(writer), Some(guard))
            }
            None => (None, None),
        };

        let pretty_console = (console.enabled && console.is_pretty()).then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(console.ansi)
                .with_target(true)
                .with_filter(console_level)
        });
        let jsonl_console = (console.enabled && !console.is_pretty())
            .then(|| jsonl_layer(std::io::stdout, &self.config.jsonl).with_filter(console_level));
        let file_layer = file_writer.map(|writer| jsonl_layer(writer, &self.config.jsonl));

        Registry::default()
            .with(env_filter)
            .with(ViewContextLayer::new())
            .with(pretty_console)
            .with(jsonl_console)
            .with(file_layer)
            .try_init()?;

        Ok(guard)
    }
}

/// Open the writer for file output
///
/// `Never` truncates a single `<prefix>.log`; the rolling strategies append
/// to dated files and prune beyond `max_files`.
fn create_file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let io_error = |source| LoggingError::File {
        path: config.directory.clone(),
        source,
    };
    fs::create_dir_all(&config.directory).map_err(io_error)?;

    let rotation = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            let file = File::create(&path).map_err(io_error)?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let mut appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&config.prefix)
        .filename_suffix("log");
    if let Some(max_files) = config.max_files {
        appender = appender.max_log_files(max_files);
    }
    let appender = appender.build(&config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// JSONL to console at `info`
pub fn init_default() -> Result<Option<WorkerGuard>, LoggingError> {
    FolioSubscriberBuilder::new().init()
}

/// Pretty console output at `debug`
pub fn init_development() -> Result<Option<WorkerGuard>, LoggingError> {
    FolioSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
}

/// Warnings only; ignores an already-installed subscriber
pub fn init_testing() {
    let _ = FolioSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creation() {
        let builder = FolioSubscriberBuilder::new();
        assert_eq!(builder.config().default_level, "info");
        assert!(!builder.config().console.is_pretty());
    }

    #[test]
    fn test_builder_with_config() {
        let builder = FolioSubscriberBuilder::new().with_config(LogConfig::development());
        assert_eq!(builder.config().default_level, "debug");
        assert!(builder.config().console.is_pretty());
    }

    #[test]
    fn test_builder_overrides() {
        let builder = FolioSubscriberBuilder::new()
            .with_level("trace")
            .with_console(false)
            .with_file_output(FileConfig::default());
        assert_eq!(builder.config().default_level, "trace");
        assert!(!builder.config().console.enabled);
        assert!(builder.config().file.is_some());
    }

    #[test]
    fn test_never_rotation_creates_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            directory: dir.path().join("logs"),
            prefix: "session".into(),
            rotation: RotationStrategy::Never,
            max_files: None,
        };

        let (_writer, _guard) = create_file_writer(&config).unwrap();
        assert!(dir.path().join("logs/session.log").exists());
    }

    #[test]
    fn test_rolling_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            directory: dir.path().join("rolling"),
            ..FileConfig::default()
        };

        let (_writer, _guard) = create_file_writer(&config).unwrap();
        assert!(dir.path().join("rolling").is_dir());
    }

    #[test]
    fn test_invalid_console_level() {
        let mut config = LogConfig::testing();
        config.console.level = Some("loud".into());
        let err = FolioSubscriberBuilder::new().with_config(config).init().unwrap_err();
        assert!(matches!(err, LoggingError::Level(level) if level == "loud"));
    }
}
