//! Logging configuration for the portfolio shell
//!
//! The shell logs JSON lines by default. `development()` switches the console
//! to a readable format, `production()` writes rolling files next to the app
//! and `testing()` keeps test output to warnings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Webview crates that log every frame at `debug`
const WEBVIEW_CRATES: [&str; 3] = ["wry", "tao", "dioxus_desktop"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for everything without an override; `RUST_LOG` replaces the
    /// whole filter
    pub default_level: String,
    pub console: ConsoleConfig,
    /// Rolling file output, off unless set
    pub file: Option<FileConfig>,
    /// Shape of JSON lines on the console and in files
    pub jsonl: JsonlConfig,
    pub filters: FilterConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
            filters: FilterConfig::quiet_webview(),
        }
    }
}

impl LogConfig {
    /// Readable console output with controller internals at `debug`
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            console: ConsoleConfig {
                format: ConsoleFormat::Pretty,
                ansi: true,
                ..ConsoleConfig::default()
            },
            ..Self::default()
        }
    }

    /// Daily files under `log_dir`; the console stays silent
    pub fn production(log_dir: PathBuf) -> Self {
        Self {
            console: ConsoleConfig {
                enabled: false,
                ..ConsoleConfig::default()
            },
            file: Some(FileConfig {
                directory: log_dir,
                ..FileConfig::default()
            }),
            ..Self::default()
        }
    }

    /// Warnings only, no colors, nothing on disk
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            console: ConsoleConfig {
                level: Some("warn".to_string()),
                ..ConsoleConfig::default()
            },
            filters: FilterConfig::default(),
            ..Self::default()
        }
    }

    /// `EnvFilter` directives built from this config
    ///
    /// Order: default level, target overrides by name, verbose crates at
    /// the default level, then silenced crates. Later directives win for
    /// the same target.
    pub fn filter_directives(&self) -> String {
        let filters = &self.filters;
        std::iter::once(self.default_level.clone())
            .chain(filters.targets.iter().map(|(target, level)| format!("{target}={level}")))
            .chain(
                filters
                    .verbose_crates
                    .iter()
                    .map(|krate| format!("{krate}={}", self.default_level)),
            )
            .chain(filters.silenced_crates.iter().map(|krate| format!("{krate}=off")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// How console lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub format: ConsoleFormat,
    /// Colors; only honored by the pretty format
    pub ansi: bool,
    /// Extra cap on console lines, on top of the filter
    pub level: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: ConsoleFormat::Json,
            ansi: false,
            level: None,
        }
    }
}

impl ConsoleConfig {
    pub fn is_pretty(&self) -> bool {
        self.format == ConsoleFormat::Pretty
    }
}

/// Where the shell keeps its log files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub directory: PathBuf,
    /// File stem: `<prefix>.log`, or `<prefix>.<date>.log` when rolling
    pub prefix: String,
    pub rotation: RotationStrategy,
    /// Oldest files beyond this count are pruned; `None` keeps all
    pub max_files: Option<usize>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            prefix: "folio-desktop".to_string(),
            rotation: RotationStrategy::Daily,
            max_files: Some(14),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// One file, truncated at startup
    Never,
}

/// Fields written into each JSON line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Event fields at the top level instead of under `fields`
    pub flatten_fields: bool,
    /// Every enclosing span, outermost first
    pub span_list: bool,
    /// The innermost span, which carries `view` and `session_id`
    pub current_span: bool,
    pub threads: bool,
    pub source_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_fields: true,
            span_list: false,
            current_span: true,
            threads: true,
            source_location: false,
        }
    }
}

/// Per-target levels on top of `default_level`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Crates kept at the default level even if a target override is quieter
    pub verbose_crates: Vec<String>,
    /// Crates turned off entirely
    pub silenced_crates: Vec<String>,
    /// `target = level` pairs
    pub targets: BTreeMap<String, String>,
}

impl FilterConfig {
    /// Caps the webview stack at `warn`
    pub fn quiet_webview() -> Self {
        Self {
            targets: WEBVIEW_CRATES
                .iter()
                .map(|krate| (krate.to_string(), "warn".to_string()))
                .collect(),
            ..Self::default()
        }
    }
}
