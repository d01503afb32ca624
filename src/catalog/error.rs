//! Catalog error types.

use std::fmt;
use thiserror::Error;

/// A name that did not resolve against the catalog.
///
/// Each variant carries the names the caller asked for so the message can
/// point at the exact miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No template with this name
    Template(String),

    /// Template exists but has no position with this name
    Position { template: String, position: String },

    /// No design with this name
    Design(String),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(name) => write!(f, "Unknown template '{}'", name),
            Self::Position { template, position } => write!(
                f,
                "Position '{}' not found in template '{}'",
                position, template
            ),
            Self::Design(name) => write!(f, "Unknown design '{}'", name),
        }
    }
}

impl std::error::Error for NotFound {}

/// Errors raised while loading or validating a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Failed to fetch catalog: {0}")]
    Fetch(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Failure to pick a tenant catalog for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Multi-tenant deployment and no API key was sent
    MissingApiKey,

    /// API key does not belong to any tenant
    InvalidApiKey,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Missing API key"),
            Self::InvalidApiKey => write!(f, "Invalid API key"),
        }
    }
}

impl std::error::Error for AccessError {}
