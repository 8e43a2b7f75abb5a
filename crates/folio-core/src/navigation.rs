//! Navigation composer
//!
//! Glues the theme manager, scroll tracker, active section tracker and
//! rotating label into what the header and landing section render, and
//! turns navigation clicks into scroll requests.
//!
//! ## Header presentation
//!
//! [`HeaderAppearance::resolve`] is a pure function of `(is_compact, mode)`:
//!
//! | compact | mode  | layout    | container                          |
//! |---------|-------|-----------|------------------------------------|
//! | no      | dark  | Expanded  | transparent                        |
//! | no      | light | Expanded  | transparent                        |
//! | yes     | dark  | Condensed | solid dark, blurred, shadowed      |
//! | yes     | light | Condensed | solid light, blurred, shadowed     |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::active_section::ActiveSectionTracker;
use crate::rotation::RotatingLabel;
use crate::scroll::ScrollTracker;
use crate::section::{NavItem, SectionId, SectionRegistry};
use crate::theme::{ThemeManager, ThemeMode};
use crate::traits::{NavigationHost, ScrollBehavior};

/// Header layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderLayout {
    /// Transparent, tall header over the landing section
    Expanded,
    /// Solid, condensed header once the page has scrolled
    Condensed,
}

/// Icon on the theme toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleIcon {
    Sun,
    Moon,
}

impl ToggleIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ToggleIcon::Sun => "\u{2600}",
            ToggleIcon::Moon => "\u{263E}",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ToggleIcon::Sun => "Switch to light mode",
            ToggleIcon::Moon => "Switch to dark mode",
        }
    }
}

/// Resolved header presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderAppearance {
    pub layout: HeaderLayout,
    pub mode: ThemeMode,
}

impl HeaderAppearance {
    pub fn resolve(is_compact: bool, mode: ThemeMode) -> Self {
        let layout = if is_compact {
            HeaderLayout::Condensed
        } else {
            HeaderLayout::Expanded
        };
        Self { layout, mode }
    }

    pub fn is_condensed(&self) -> bool {
        self.layout == HeaderLayout::Condensed
    }

    /// Classes for the header container
    pub fn container_class(&self) -> &'static str {
        match (self.layout, self.mode) {
            (HeaderLayout::Expanded, _) => "site-header expanded bg-transparent py-6",
            (HeaderLayout::Condensed, ThemeMode::Dark) => {
                "site-header condensed bg-gray-900/95 backdrop-blur-sm shadow-md py-4"
            }
            (HeaderLayout::Condensed, ThemeMode::Light) => {
                "site-header condensed bg-white/95 backdrop-blur-sm shadow-md py-4"
            }
        }
    }

    /// Classes for the site title
    pub fn title_class(&self) -> &'static str {
        match (self.layout, self.mode) {
            (HeaderLayout::Condensed, ThemeMode::Light) => "site-title text-gray-800",
            _ => "site-title text-white",
        }
    }

    /// Classes for a navigation link
    pub fn link_class(&self) -> &'static str {
        match (self.layout, self.mode) {
            (HeaderLayout::Expanded, _) => "nav-link text-white hover:text-blue-200",
            (HeaderLayout::Condensed, ThemeMode::Dark) => "nav-link text-white hover:text-blue-400",
            (HeaderLayout::Condensed, ThemeMode::Light) => {
                "nav-link text-gray-800 hover:text-blue-600"
            }
        }
    }

    /// Classes for the theme toggle button
    pub fn toggle_class(&self) -> &'static str {
        match (self.layout, self.mode) {
            (HeaderLayout::Expanded, ThemeMode::Dark) => {
                "theme-toggle bg-gray-800/50 text-yellow-400 hover:bg-gray-800"
            }
            (HeaderLayout::Expanded, ThemeMode::Light) => {
                "theme-toggle bg-white/10 text-white hover:bg-white/20"
            }
            (HeaderLayout::Condensed, ThemeMode::Dark) => {
                "theme-toggle bg-gray-800 text-yellow-400 hover:bg-gray-700"
            }
            (HeaderLayout::Condensed, ThemeMode::Light) => {
                "theme-toggle bg-gray-100 text-gray-900 hover:bg-gray-200"
            }
        }
    }

    /// Sun offers light mode while dark; moon offers dark mode while light
    pub fn toggle_icon(&self) -> ToggleIcon {
        match self.mode {
            ThemeMode::Dark => ToggleIcon::Sun,
            ThemeMode::Light => ToggleIcon::Moon,
        }
    }
}

/// A navigation item and whether its section is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub item: NavItem,
    pub active: bool,
}

/// Composes the controllers for the header and landing section
pub struct NavigationComposer {
    registry: SectionRegistry,
    theme: Arc<ThemeManager>,
    scroll: ScrollTracker,
    sections: ActiveSectionTracker,
    roles: RotatingLabel,
    host: Arc<dyn NavigationHost>,
}

impl NavigationComposer {
    pub fn new(
        theme: Arc<ThemeManager>,
        scroll: ScrollTracker,
        sections: ActiveSectionTracker,
        roles: RotatingLabel,
        host: Arc<dyn NavigationHost>,
    ) -> Self {
        let registry = sections.registry().clone();
        info!(sections = registry.len(), "Navigation composed");
        Self {
            registry,
            theme,
            scroll,
            sections,
            roles,
            host,
        }
    }

    /// Bring the section into view
    ///
    /// Unknown ids, and ids the host has not rendered, are ignored.
    /// Returns `true` if a scroll was requested.
    pub fn scroll_to_section(&self, id: &str) -> bool {
        let Some(item) = self.registry.get(id) else {
            debug!(section = id, "Ignoring navigation to unregistered section");
            return false;
        };
        if !self.host.has_region(&item.id) {
            debug!(section = id, "Ignoring navigation to section with no rendered region");
            return false;
        }
        self.host.scroll_into_view(&item.id, ScrollBehavior::Smooth);
        debug!(section = id, "Scrolling to section");
        true
    }

    pub fn header_appearance(&self) -> HeaderAppearance {
        HeaderAppearance::resolve(self.scroll.is_compact(), self.theme.mode())
    }

    /// Registry items with their active flag, in registry order
    pub fn nav_entries(&self) -> Vec<NavEntry> {
        let active = self.sections.active_id();
        self.registry
            .items()
            .iter()
            .map(|item| NavEntry {
                item: item.clone(),
                active: item.id == active,
            })
            .collect()
    }

    pub fn active_section(&self) -> SectionId {
        self.sections.active_id()
    }

    pub fn current_role(&self) -> String {
        self.roles.current_label()
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        self.theme.toggle_theme()
    }

    pub fn theme(&self) -> &ThemeManager {
        &self.theme
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn sections(&self) -> &ActiveSectionTracker {
        &self.sections
    }

    pub fn roles(&self) -> &RotatingLabel {
        &self.roles
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Cancel every subscription; repeated calls are no-ops
    pub fn teardown(&self) {
        self.scroll.detach();
        self.sections.disconnect();
        self.roles.stop();
    }
}

impl fmt::Debug for NavigationComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationComposer")
            .field("mode", &self.theme.mode())
            .field("is_compact", &self.scroll.is_compact())
            .field("active", &self.sections.active_id())
            .field("role", &self.roles.current_label())
            .finish()
    }
}
