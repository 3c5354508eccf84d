//! Error types

use thiserror::Error;

use crate::tree::NodeKind;

/// Why a marker could not be resolved to a target view.
///
/// Every variant means "not found": callers run with the dependent feature
/// disabled rather than failing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindError {
    /// The marker id does not belong to the tree
    #[error("Marker node is not part of the view tree")]
    UnknownNode,

    /// The marker is attached less than two levels deep
    #[error("Marker has no search root two levels up")]
    NoSearchRoot,

    /// Breadth-first scan ran out of levels without meeting the marker
    #[error("Marker not reachable from its search root")]
    MarkerNotInTree,

    /// No qualifying view precedes the marker
    #[error("No {0:?} view found for marker")]
    NoCandidate(NodeKind),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed into the config structure
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level error for the layout crate
#[derive(Error, Debug)]
pub enum NavbarError {
    #[error(transparent)]
    Find(#[from] FindError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, NavbarError>;
