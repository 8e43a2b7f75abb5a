//! Error types for folio
//!
//! Only construction can fail. Runtime operations (toggles, scroll samples,
//! visibility batches, rotation ticks, navigation, teardown) degrade to a
//! no-op instead of returning an error.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for folio
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Rotation error: {0}")]
    Rotation(#[from] RotationError),

    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Invalid section list: {0}")]
    Sections(#[from] RegistryError),

    #[error("Invalid role rotation: {0}")]
    Roles(#[from] RotationError),
}

/// Errors related to the section registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Section registry is empty")]
    Empty,

    #[error("Duplicate section id: {0}")]
    DuplicateId(String),

    #[error("Section id must not be blank")]
    BlankId,

    #[error("Initial section not registered: {0}")]
    UnknownInitial(String),
}

/// Errors related to the rotating label animator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RotationError {
    #[error("Role list is empty")]
    EmptyRoles,

    #[error("Rotation interval must be greater than zero")]
    ZeroInterval,
}

/// Errors reported by a feedback cue
///
/// These never escape the theme manager; they are logged and dropped.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("Cue playback rejected: {0}")]
    Rejected(String),
}

/// Errors related to theme preference persistence
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type alias for folio operations
pub type FolioResult<T> = Result<T, FolioError>;
