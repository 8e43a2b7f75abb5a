//! Section identifiers and the static section registry
//!
//! The registry is declared once at startup and shared by the active
//! section tracker and the navigation composer. Ids must be unique and
//! match the anchor ids of the rendered regions.

use std::collections::HashSet;
use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Identifier of an addressable page region
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A navigation entry: section id plus its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: SectionId,
    pub label: String,
}

impl NavItem {
    pub fn new(id: impl Into<SectionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered, immutable set of registered sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    items: Arc<[NavItem]>,
    initial: usize,
}

impl SectionRegistry {
    /// Build a registry whose initial section is the first entry
    pub fn new(items: Vec<NavItem>) -> Result<Self, RegistryError> {
        Self::validate(&items)?;
        Ok(Self {
            items: items.into(),
            initial: 0,
        })
    }

    /// Build a registry with an explicit initial section
    pub fn with_initial(items: Vec<NavItem>, initial: &SectionId) -> Result<Self, RegistryError> {
        Self::validate(&items)?;
        let initial = items
            .iter()
            .position(|item| &item.id == initial)
            .ok_or_else(|| RegistryError::UnknownInitial(initial.to_string()))?;
        Ok(Self {
            items: items.into(),
            initial,
        })
    }

    fn validate(items: &[NavItem]) -> Result<(), RegistryError> {
        if items.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if item.id.as_str().trim().is_empty() {
                return Err(RegistryError::BlankId);
            }
            if !seen.insert(item.id.as_str()) {
                return Err(RegistryError::DuplicateId(item.id.to_string()));
            }
        }
        Ok(())
    }

    /// Section active before any visibility batch arrives
    pub fn initial(&self) -> &SectionId {
        &self.items[self.initial].id
    }

    /// All navigation items in registry order
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// All section ids in registry order
    pub fn ids(&self) -> Vec<SectionId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Look up a registered section by raw id
    pub fn get(&self, id: &str) -> Option<&NavItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for SectionRegistry {
    /// hero, about, skills, projects, contact
    fn default() -> Self {
        Self {
            items: default_nav_items().into(),
            initial: 0,
        }
    }
}

/// The stock landing page layout
pub fn default_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new("hero", "Home"),
        NavItem::new("about", "About"),
        NavItem::new("skills", "Skills"),
        NavItem::new("projects", "Projects"),
        NavItem::new("contact", "Contact"),
    ]
}
