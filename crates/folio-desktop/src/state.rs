//! Page session and shell-wide state.

use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Handle, Runtime};

use folio_core::{
    Clock, FolioConfig, FolioResult, HeaderAppearance, HostBindings, NavEntry,
    NavigationComposer, ScrollHub, ThemeMode, TokioClock, VisibilityHub, mount,
};

use crate::host::{DomCue, DomNavigationHost, DomThemeSink};

/// Options resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    pub config: FolioConfig,
    /// Replaces `theme.default_mode`; a stored preference still wins.
    pub theme_override: Option<ThemeMode>,
}

impl ShellOptions {
    /// Config with command line overrides applied.
    pub fn effective_config(&self) -> FolioConfig {
        let mut config = self.config.clone();
        if let Some(mode) = self.theme_override {
            config.theme.default_mode = mode;
        }
        config
    }
}

/// Global storage for the shell options.
static SHELL_OPTIONS: OnceLock<ShellOptions> = OnceLock::new();

/// Runtime driving the rotation timer.
static TIMER_RUNTIME: OnceLock<Runtime> = OnceLock::new();

pub fn install_options(options: ShellOptions) {
    SHELL_OPTIONS.set(options).ok();
}

pub fn options() -> ShellOptions {
    SHELL_OPTIONS.get().cloned().unwrap_or_default()
}

pub fn install_timer_runtime(runtime: Runtime) {
    TIMER_RUNTIME.set(runtime).ok();
}

/// Clock on the installed timer runtime, or the ambient tokio runtime.
pub fn timer_clock() -> Option<TokioClock> {
    match TIMER_RUNTIME.get() {
        Some(runtime) => Some(TokioClock::new(runtime.handle().clone())),
        None => Handle::try_current().ok().map(TokioClock::new),
    }
}

/// What the page renders, derived from the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub appearance: HeaderAppearance,
    pub entries: Vec<NavEntry>,
    pub role: String,
}

impl ViewSnapshot {
    pub fn capture(composer: &NavigationComposer) -> Self {
        Self {
            appearance: composer.header_appearance(),
            entries: composer.nav_entries(),
            role: composer.current_role(),
        }
    }
}

/// Controllers and DOM hosts for one mount of the page.
pub struct PageSession {
    pub scroll: ScrollHub,
    pub visibility: VisibilityHub,
    pub navigation: DomNavigationHost,
    pub composer: NavigationComposer,
}

impl PageSession {
    pub fn mount(options: &ShellOptions, clock: &dyn Clock) -> FolioResult<Self> {
        let config = options.effective_config();
        let scroll = ScrollHub::new();
        let visibility = VisibilityHub::new();
        let navigation = DomNavigationHost::new();

        let composer = mount(
            &config,
            HostBindings {
                scroll: &scroll,
                visibility: &visibility,
                clock,
                theme_sink: Arc::new(DomThemeSink),
                navigation: Arc::new(navigation.clone()),
                cue: Some(Arc::new(DomCue)),
                preference: None,
            },
        )?;

        Ok(Self {
            scroll,
            visibility,
            navigation,
            composer,
        })
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::capture(&self.composer)
    }
}

/// Shared handle to the mounted session.
///
/// Two handles are equal when they point at the same session.
#[derive(Clone)]
pub struct SessionHandle(pub Rc<PageSession>);

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SessionHandle {
    type Target = PageSession;

    fn deref(&self) -> &PageSession {
        &self.0
    }
}
