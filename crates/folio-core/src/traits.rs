//! Host capability traits
//!
//! The controllers never touch a rendering host directly. Everything they
//! need from the page is injected through these traits, so the same logic
//! runs against the desktop shell and against the in-memory hosts in
//! [`crate::host`].
//!
//! ## Key Traits
//!
//! - [`ThemeSink`]: applies the global dark/light marker
//! - [`FeedbackCue`]: optional cue played after a theme toggle
//! - [`ScrollSource`]: vertical scroll offset stream
//! - [`VisibilitySource`]: intersection batches for page regions
//! - [`Clock`]: repeating timers for testability
//! - [`NavigationHost`]: region lookup and scroll-into-view
//! - [`ThemePreferenceStore`]: optional theme persistence

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CueError, PreferenceError};
use crate::section::SectionId;
use crate::subscription::Subscription;
use crate::theme::ThemeMode;

/// Callback invoked with each scroll offset sample
pub type ScrollCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Callback invoked with each intersection batch
pub type VisibilityCallback = Arc<dyn Fn(&[VisibilityEntry]) + Send + Sync>;

/// Callback invoked on each timer tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// One entry of an intersection batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    /// The observed section
    pub id: SectionId,
    /// Whether the region intersects the viewport
    pub is_intersecting: bool,
    /// Visible fraction of the region, 0.0 to 1.0
    pub intersection_ratio: f64,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<SectionId>, is_intersecting: bool, intersection_ratio: f64) -> Self {
        Self {
            id: id.into(),
            is_intersecting,
            intersection_ratio,
        }
    }

    /// An entry that is fully in view
    pub fn visible(id: impl Into<SectionId>) -> Self {
        Self::new(id, true, 1.0)
    }

    /// An entry that has left the viewport
    pub fn hidden(id: impl Into<SectionId>) -> Self {
        Self::new(id, false, 0.0)
    }
}

/// How a region is brought into view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

impl ScrollBehavior {
    /// Value for the DOM `scrollIntoView` behavior option
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Instant => "instant",
        }
    }
}

/// Applies the document-level theme marker
pub trait ThemeSink: Send + Sync {
    /// Apply (dark) or remove (light) the global marker
    fn apply_theme(&self, mode: ThemeMode);
}

/// Optional feedback played after a theme toggle
pub trait FeedbackCue: Send + Sync {
    /// Play the cue; must return promptly
    fn play(&self) -> Result<(), CueError>;
}

/// Source of vertical scroll offsets
pub trait ScrollSource: Send + Sync {
    /// Register a callback for offset samples
    fn subscribe(&self, callback: ScrollCallback) -> Subscription;
}

/// Source of intersection batches
pub trait VisibilitySource: Send + Sync {
    /// Observe the given regions; the callback receives each batch in
    /// the order the host reports it
    fn observe(
        &self,
        targets: &[SectionId],
        threshold: f64,
        callback: VisibilityCallback,
    ) -> Subscription;
}

/// Time abstraction for testability
///
/// Implementations deliver ticks for one timer strictly in order;
/// no ordering is promised between different timers.
pub trait Clock: Send + Sync {
    /// Invoke `tick` every `interval` until the subscription is cancelled
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Subscription;
}

/// Rendering host for navigation commands
pub trait NavigationHost: Send + Sync {
    /// Whether a region with this id exists in the rendered page
    fn has_region(&self, id: &SectionId) -> bool;

    /// Ask the host to bring the region into view
    fn scroll_into_view(&self, id: &SectionId, behavior: ScrollBehavior);
}

/// Persistence for the dark/light preference
pub trait ThemePreferenceStore: Send + Sync {
    /// Load the stored mode, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<ThemeMode>, PreferenceError>;

    /// Store the mode
    fn save(&self, mode: ThemeMode) -> Result<(), PreferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_entry_helpers() {
        let entry = VisibilityEntry::visible("about");
        assert!(entry.is_intersecting);
        assert_eq!(entry.intersection_ratio, 1.0);
        assert_eq!(entry.id.as_str(), "about");

        let entry = VisibilityEntry::hidden("about");
        assert!(!entry.is_intersecting);
        assert_eq!(entry.intersection_ratio, 0.0);
    }

    #[test]
    fn test_scroll_behavior_values() {
        assert_eq!(ScrollBehavior::default(), ScrollBehavior::Smooth);
        assert_eq!(ScrollBehavior::Smooth.as_str(), "smooth");
        assert_eq!(ScrollBehavior::Instant.as_str(), "instant");
    }
}
