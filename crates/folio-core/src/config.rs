//! Configuration for the view-state controllers
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! [theme]
//! default_mode = "dark"
//! sound_cue = true
//!
//! [header]
//! compact_threshold = 50.0
//!
//! [sections]
//! visibility_threshold = 0.5
//! contact = "contact"
//! items = [
//!     { id = "hero", label = "Home" },
//!     { id = "contact", label = "Contact" },
//! ]
//!
//! [roles]
//! interval_ms = 3000
//! labels = ["Full Stack Developer", "Cloud Architect"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::active_section::VISIBILITY_THRESHOLD;
use crate::error::{ConfigError, RegistryError, RotationError};
use crate::rotation::{ROTATION_INTERVAL, default_roles};
use crate::scroll::COMPACT_THRESHOLD;
use crate::section::{NavItem, SectionId, SectionRegistry, default_nav_items};
use crate::theme::ThemeMode;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Theme defaults and side effects
    pub theme: ThemeConfig,
    /// Header presentation
    pub header: HeaderConfig,
    /// Registered sections
    pub sections: SectionsConfig,
    /// Rotating role labels
    pub roles: RolesConfig,
}

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Mode used when no preference is stored
    pub default_mode: ThemeMode,
    /// Play a cue after each toggle
    pub sound_cue: bool,
    /// Where to persist the preference; unset means no persistence
    pub preference_path: Option<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_mode: ThemeMode::Dark,
            sound_cue: true,
            preference_path: None,
        }
    }
}

/// Header configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Scroll offset past which the header turns compact
    pub compact_threshold: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            compact_threshold: COMPACT_THRESHOLD,
        }
    }
}

/// Section configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Visible fraction needed to become active
    pub visibility_threshold: f64,
    /// Section active before the first batch; defaults to the first item
    pub initial: Option<SectionId>,
    /// Target of the landing call to action
    pub contact: SectionId,
    /// Sections in page order
    pub items: Vec<NavItem>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: VISIBILITY_THRESHOLD,
            initial: None,
            contact: SectionId::new("contact"),
            items: default_nav_items(),
        }
    }
}

/// Role rotation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Milliseconds between rotation ticks
    pub interval_ms: u64,
    /// Labels in display order
    pub labels: Vec<String>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            interval_ms: ROTATION_INTERVAL.as_millis() as u64,
            labels: default_roles(),
        }
    }
}

impl RolesConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl FolioConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every value the controllers rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.header.compact_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "header.compact_threshold",
                reason: format!("must be a finite, non-negative offset, got {threshold}"),
            });
        }

        let ratio = self.sections.visibility_threshold;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "sections.visibility_threshold",
                reason: format!("must be in (0, 1], got {ratio}"),
            });
        }

        self.registry()?;

        if self.roles.labels.is_empty() {
            return Err(RotationError::EmptyRoles.into());
        }
        if self.roles.interval_ms == 0 {
            return Err(RotationError::ZeroInterval.into());
        }
        Ok(())
    }

    /// Call-to-action target, if that section is registered
    pub fn contact_section(&self) -> Option<&SectionId> {
        self.sections
            .items
            .iter()
            .map(|item| &item.id)
            .find(|id| *id == &self.sections.contact)
    }

    /// Build the section registry described by this config
    pub fn registry(&self) -> Result<SectionRegistry, RegistryError> {
        let items = self.sections.items.clone();
        match &self.sections.initial {
            Some(initial) => SectionRegistry::with_initial(items, initial),
            None => SectionRegistry::new(items),
        }
    }
}
