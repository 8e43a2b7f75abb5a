//! # Folio Core
//!
//! View-state controllers for a single-page portfolio shell.
//!
//! The controllers hold no reference to a rendering host. Scroll offsets,
//! intersection batches, timers, the theme marker and scroll-into-view
//! requests all go through injected capabilities, so the same logic runs
//! in the desktop shell and in deterministic tests.
//!
//! ## Controllers
//!
//! - [`ThemeManager`]: dark/light flag with a global marker sink
//! - [`ScrollTracker`]: compact-header flag from the scroll offset
//! - [`ActiveSectionTracker`]: which registered section is in view
//! - [`RotatingLabel`]: role label cycling on a repeating timer
//! - [`NavigationComposer`]: header presentation and scroll-to-section
//!
//! ## Key Traits
//!
//! - [`ThemeSink`], [`FeedbackCue`], [`ThemePreferenceStore`]: theme side effects
//! - [`ScrollSource`], [`VisibilitySource`]: host observers
//! - [`Clock`]: repeating timers for testability
//! - [`NavigationHost`]: region lookup and scrolling
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_core::*;
//!
//! let scroll = ScrollHub::new();
//! let visibility = VisibilityHub::new();
//! let clock = ManualClock::new();
//! let registry = SectionRegistry::default();
//!
//! let composer = mount(
//!     &FolioConfig::default(),
//!     HostBindings {
//!         scroll: &scroll,
//!         visibility: &visibility,
//!         clock: &clock,
//!         theme_sink: Arc::new(RecordingThemeSink::new()),
//!         navigation: Arc::new(StaticNavigationHost::from_registry(&registry)),
//!         cue: None,
//!         preference: None,
//!     },
//! )?;
//!
//! scroll.publish(120.0);
//! assert!(composer.header_appearance().is_condensed());
//! ```

pub mod active_section;
pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod mount;
pub mod navigation;
pub mod preference;
pub mod rotation;
pub mod scroll;
pub mod section;
pub mod subscription;
pub mod theme;
pub mod traits;

// Re-export main types
pub use active_section::{ActiveSectionTracker, SectionVisibility, VISIBILITY_THRESHOLD};
pub use clock::{ManualClock, TokioClock};
pub use config::{FolioConfig, HeaderConfig, RolesConfig, SectionsConfig, ThemeConfig};
pub use error::*;
pub use host::{
    FailingCue, MemoryPreferenceStore, RecordingThemeSink, ScrollHub, SilentCue,
    StaticNavigationHost, VisibilityHub,
};
pub use mount::{HostBindings, mount};
pub use navigation::{HeaderAppearance, HeaderLayout, NavEntry, NavigationComposer, ToggleIcon};
pub use preference::JsonPreferenceStore;
pub use rotation::{ROTATION_INTERVAL, RoleRotation, RotatingLabel, default_roles};
pub use scroll::{COMPACT_THRESHOLD, ScrollState, ScrollTracker, is_compact};
pub use section::{NavItem, SectionId, SectionRegistry, default_nav_items};
pub use subscription::Subscription;
pub use theme::{ThemeManager, ThemeManagerBuilder, ThemeMode};
pub use traits::*;
