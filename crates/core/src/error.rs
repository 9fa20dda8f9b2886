//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The sync engine itself never fails: validation problems, ambiguous
/// conflicts and unknown warehouses are all reported as data. This type only
/// covers parsing of identifiers and enumerated values at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A string did not name any known variant of an enumerated value.
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// Configuration loading error.
///
/// Malformed configuration is rejected at load time, before any sync cycle
/// starts; the engine assumes it only ever sees a validated configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("{key}: cannot parse {value:?} ({reason})")]
    Parse {
        key: String,
        value: String,
        reason: String,
    },

    /// One or more fields are outside their allowed range.
    #[error("invalid sync configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
