//! Theme state manager
//!
//! Owns the dark/light flag. A toggle flips the flag, applies the global
//! marker through the [`ThemeSink`], and only then publishes the new mode to
//! watchers, so every consumer observes a marker that already matches.
//!
//! The optional cue and preference store run after the flip. Their
//! failures are logged and dropped.

use std::fmt;
use std::sync::Arc;

use derive_more::Display;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::traits::{FeedbackCue, ThemePreferenceStore, ThemeSink};

/// Dark or light presentation
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    #[display("dark")]
    Dark,
    #[display("light")]
    Light,
}

impl ThemeMode {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { ThemeMode::Dark } else { ThemeMode::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    /// The opposite mode
    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Class placed on the document root while dark
    pub const ROOT_CLASS: &'static str = "dark";

    /// Returns the display name for the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }
}

/// Builder for [`ThemeManager`]
pub struct ThemeManagerBuilder {
    default_mode: ThemeMode,
    sink: Arc<dyn ThemeSink>,
    cue: Option<Arc<dyn FeedbackCue>>,
    store: Option<Arc<dyn ThemePreferenceStore>>,
}

impl ThemeManagerBuilder {
    /// Play a cue after each toggle
    pub fn with_cue(mut self, cue: Arc<dyn FeedbackCue>) -> Self {
        self.cue = Some(cue);
        self
    }

    /// Restore the mode from `store` on build and save it after each toggle
    pub fn with_store(mut self, store: Arc<dyn ThemePreferenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolve the starting mode and apply the marker once
    pub fn build(self) -> ThemeManager {
        let stored = self.store.as_ref().and_then(|store| match store.load() {
            Ok(mode) => mode,
            Err(e) => {
                warn!(error = %e, "Failed to load theme preference, using default");
                None
            }
        });
        let initial = stored.unwrap_or(self.default_mode);

        self.sink.apply_theme(initial);
        info!(mode = %initial, restored = stored.is_some(), "Theme initialized");

        let (state, _) = watch::channel(initial);
        ThemeManager {
            state,
            sink: self.sink,
            cue: self.cue,
            store: self.store,
            toggle_lock: Mutex::new(()),
        }
    }
}

/// Owner of the dark/light flag
pub struct ThemeManager {
    state: watch::Sender<ThemeMode>,
    sink: Arc<dyn ThemeSink>,
    cue: Option<Arc<dyn FeedbackCue>>,
    store: Option<Arc<dyn ThemePreferenceStore>>,
    toggle_lock: Mutex<()>,
}

impl ThemeManager {
    /// Start building a manager around the given sink
    pub fn builder(default_mode: ThemeMode, sink: Arc<dyn ThemeSink>) -> ThemeManagerBuilder {
        ThemeManagerBuilder {
            default_mode,
            sink,
            cue: None,
            store: None,
        }
    }

    /// Manager with no cue and no persistence
    pub fn new(default_mode: ThemeMode, sink: Arc<dyn ThemeSink>) -> Self {
        Self::builder(default_mode, sink).build()
    }

    pub fn mode(&self) -> ThemeMode {
        *self.state.borrow()
    }

    pub fn is_dark(&self) -> bool {
        self.mode().is_dark()
    }

    /// Watch mode changes
    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.state.subscribe()
    }

    /// Flip the mode and return the new one
    pub fn toggle_theme(&self) -> ThemeMode {
        let next = {
            let _guard = self.toggle_lock.lock();
            let next = self.mode().toggled();
            self.sink.apply_theme(next);
            self.state.send_replace(next);
            next
        };
        info!(mode = %next, "Theme toggled");

        self.persist(next);
        self.play_cue();
        next
    }

    fn persist(&self, mode: ThemeMode) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(mode) {
                warn!(error = %e, mode = %mode, "Failed to save theme preference");
            }
        }
    }

    fn play_cue(&self) {
        if let Some(cue) = &self.cue {
            match cue.play() {
                Ok(()) => debug!("Theme cue played"),
                Err(e) => warn!(error = %e, "Theme cue failed"),
            }
        }
    }
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManager")
            .field("mode", &self.mode())
            .field("has_cue", &self.cue.is_some())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FailingCue, MemoryPreferenceStore, RecordingThemeSink, SilentCue};

    #[test]
    fn test_mode_helpers() {
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_is_dark(false), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.to_string(), "dark");
        assert_eq!(ThemeMode::Light.display_name(), "Light");
    }

    #[test]
    fn test_toggle_parity() {
        for initial in [ThemeMode::Dark, ThemeMode::Light] {
            let sink = Arc::new(RecordingThemeSink::new());
            let manager = ThemeManager::new(initial, sink.clone());

            for n in 1..=7usize {
                manager.toggle_theme();
                assert_eq!(manager.is_dark(), initial.is_dark() ^ (n % 2 == 1));
            }
        }
    }

    #[test]
    fn test_sink_applied_once_per_toggle() {
        let sink = Arc::new(RecordingThemeSink::new());
        let manager = ThemeManager::new(ThemeMode::Light, sink.clone());
        assert_eq!(sink.applied(), vec![ThemeMode::Light]);

        manager.toggle_theme();
        manager.toggle_theme();
        assert_eq!(
            sink.applied(),
            vec![ThemeMode::Light, ThemeMode::Dark, ThemeMode::Light]
        );
        assert_eq!(sink.current(), Some(ThemeMode::Light));
    }

    #[test]
    fn test_marker_applied_before_watchers_see_change() {
        let sink = Arc::new(RecordingThemeSink::new());
        let manager = ThemeManager::new(ThemeMode::Dark, sink.clone());
        let mut rx = manager.subscribe();

        manager.toggle_theme();
        assert!(rx.has_changed().unwrap());
        let seen = *rx.borrow_and_update();
        assert_eq!(seen, ThemeMode::Light);
        assert_eq!(sink.current(), Some(seen));
    }

    #[test]
    fn test_failing_cue_does_not_block_flip() {
        let sink = Arc::new(RecordingThemeSink::new());
        let cue = Arc::new(FailingCue::new("autoplay blocked"));
        let manager = ThemeManager::builder(ThemeMode::Dark, sink.clone())
            .with_cue(cue.clone())
            .build();

        assert_eq!(manager.toggle_theme(), ThemeMode::Light);
        assert_eq!(manager.mode(), ThemeMode::Light);
        assert_eq!(cue.attempts(), 1);
    }

    #[test]
    fn test_cue_played_per_toggle() {
        let sink = Arc::new(RecordingThemeSink::new());
        let cue = Arc::new(SilentCue::new());
        let manager = ThemeManager::builder(ThemeMode::Dark, sink)
            .with_cue(cue.clone())
            .build();

        manager.toggle_theme();
        manager.toggle_theme();
        manager.toggle_theme();
        assert_eq!(cue.plays(), 3);
    }

    #[test]
    fn test_store_restores_and_saves() {
        let store = Arc::new(MemoryPreferenceStore::with_mode(ThemeMode::Light));
        let sink = Arc::new(RecordingThemeSink::new());
        let manager = ThemeManager::builder(ThemeMode::Dark, sink.clone())
            .with_store(store.clone())
            .build();

        assert_eq!(manager.mode(), ThemeMode::Light);
        assert_eq!(sink.applied(), vec![ThemeMode::Light]);

        manager.toggle_theme();
        assert_eq!(store.stored(), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_empty_store_uses_default() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let sink = Arc::new(RecordingThemeSink::new());
        let manager = ThemeManager::builder(ThemeMode::Light, sink)
            .with_store(store)
            .build();
        assert_eq!(manager.mode(), ThemeMode::Light);
    }
}
