//! Entry point for the folio desktop shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

use folio_core::{FolioConfig, ThemeMode};
use folio_desktop::components::App;
use folio_desktop::state::{self, ShellOptions};
use folio_logging::{FolioSubscriberBuilder, LogConfig, ViewContextGuard, view_span};

/// CSS styles embedded at compile time.
const STYLES_CSS: &str = include_str!("../assets/styles.css");

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "folio-desktop")]
#[command(about = "Single-page portfolio shell")]
struct Args {
    /// TOML configuration file (built-in defaults if not provided)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty, verbose console logs
    #[arg(long)]
    dev: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Start in light mode unless a preference is stored
    #[arg(long, conflicts_with = "dark")]
    light: bool,

    /// Start in dark mode unless a preference is stored
    #[arg(long)]
    dark: bool,
}

impl Args {
    fn theme_override(&self) -> Option<ThemeMode> {
        match (self.light, self.dark) {
            (true, _) => Some(ThemeMode::Light),
            (_, true) => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    fn log_config(&self) -> LogConfig {
        let mut config = if self.dev {
            LogConfig::development()
        } else {
            LogConfig::default()
        };
        if let Some(level) = &self.log_level {
            config.default_level = level.clone();
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = FolioSubscriberBuilder::new()
        .with_config(args.log_config())
        .init()
        .context("failed to initialize logging")?;

    let config = match &args.config {
        Some(path) => FolioConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FolioConfig::default(),
    };

    let timers = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("folio-timers")
        .enable_time()
        .build()
        .context("failed to start timer runtime")?;
    state::install_timer_runtime(timers);
    state::install_options(ShellOptions {
        config,
        theme_override: args.theme_override(),
    });

    let _view = ViewContextGuard::new("portfolio");
    let _span = view_span().entered();
    tracing::info!("Starting folio shell");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title("Portfolio")
                        .with_inner_size(LogicalSize::new(1280, 860))
                        .with_resizable(true),
                )
                .with_custom_head(format!("<style>{}</style>", STYLES_CSS)),
        )
        .launch(App);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_flags() {
        let args = Args::parse_from(["folio-desktop", "--light"]);
        assert_eq!(args.theme_override(), Some(ThemeMode::Light));

        let args = Args::parse_from(["folio-desktop", "--dark"]);
        assert_eq!(args.theme_override(), Some(ThemeMode::Dark));

        let args = Args::parse_from(["folio-desktop"]);
        assert_eq!(args.theme_override(), None);

        assert!(Args::try_parse_from(["folio-desktop", "--light", "--dark"]).is_err());
    }

    #[test]
    fn test_log_flags() {
        let args = Args::parse_from(["folio-desktop", "--dev", "--log-level", "trace"]);
        let config = args.log_config();
        assert!(config.console.is_pretty());
        assert_eq!(config.default_level, "trace");

        let args = Args::parse_from(["folio-desktop", "-c", "folio.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("folio.toml")));
        assert!(!args.log_config().console.is_pretty());
    }
}
