//! Registry errors.

use std::fmt;

use thiserror::Error;

/// Which registry raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Component,
    Action,
    Store,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Component => "Component",
            Self::Action => "Action",
            Self::Store => "Store",
        })
    }
}

/// Errors raised by registry calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A non-silent call named a path with nothing callable behind it.
    #[error("{kind} not found: \"{path}\"")]
    NotFound { kind: RegistryKind, path: String },

    /// A computed store alias named a path with no store behind it.
    #[error("Store not found: \"{path}\" (alias: \"{alias}\")")]
    StoreNotFound { path: String, alias: String },
}

impl RegistryError {
    /// The path that failed to resolve.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path, .. } | Self::StoreNotFound { path, .. } => path,
        }
    }

    /// The registry that raised the error.
    pub fn kind(&self) -> RegistryKind {
        match self {
            Self::NotFound { kind, .. } => *kind,
            Self::StoreNotFound { .. } => RegistryKind::Store,
        }
    }
}
