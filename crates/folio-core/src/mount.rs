//! Mounting the controllers from configuration

use std::sync::Arc;

use tracing::info;

use crate::active_section::ActiveSectionTracker;
use crate::config::FolioConfig;
use crate::error::FolioResult;
use crate::navigation::NavigationComposer;
use crate::preference::JsonPreferenceStore;
use crate::rotation::RotatingLabel;
use crate::scroll::ScrollTracker;
use crate::theme::ThemeManager;
use crate::traits::{
    Clock, FeedbackCue, NavigationHost, ScrollSource, ThemePreferenceStore, ThemeSink,
    VisibilitySource,
};

/// Host capabilities needed to mount a page
pub struct HostBindings<'a> {
    pub scroll: &'a dyn ScrollSource,
    pub visibility: &'a dyn VisibilitySource,
    pub clock: &'a dyn Clock,
    pub theme_sink: Arc<dyn ThemeSink>,
    pub navigation: Arc<dyn NavigationHost>,
    /// Played after toggles when `theme.sound_cue` is set
    pub cue: Option<Arc<dyn FeedbackCue>>,
    /// Overrides `theme.preference_path`
    pub preference: Option<Arc<dyn ThemePreferenceStore>>,
}

/// Validate `config` and start every controller against `hosts`
pub fn mount(config: &FolioConfig, hosts: HostBindings<'_>) -> FolioResult<NavigationComposer> {
    config.validate()?;
    let registry = config.registry()?;

    let mut theme = ThemeManager::builder(config.theme.default_mode, hosts.theme_sink);
    if config.theme.sound_cue {
        if let Some(cue) = hosts.cue {
            theme = theme.with_cue(cue);
        }
    }
    let store = hosts.preference.or_else(|| {
        config
            .theme
            .preference_path
            .as_ref()
            .map(|path| Arc::new(JsonPreferenceStore::new(path)) as Arc<dyn ThemePreferenceStore>)
    });
    if let Some(store) = store {
        theme = theme.with_store(store);
    }
    let theme = Arc::new(theme.build());

    let roles = RotatingLabel::start(config.roles.labels.clone(), config.roles.interval(), hosts.clock)?;
    let scroll = ScrollTracker::with_threshold(hosts.scroll, config.header.compact_threshold);
    let sections = ActiveSectionTracker::with_threshold(
        registry,
        hosts.visibility,
        config.sections.visibility_threshold,
    );

    info!(mode = %theme.mode(), "Page mounted");
    Ok(NavigationComposer::new(theme, scroll, sections, roles, hosts.navigation))
}
