//! Error types surfaced by the simulator core.
//!
//! Two recoverable families exist: configuration errors, raised while a
//! [`Config`](crate::config::Config) is parsed and validated, and access
//! errors, raised when a caller hands `System::read`/`System::write` an
//! address that does not map onto the configured geometry. Internal
//! consistency violations (a bank about to access a row it never activated)
//! are not represented here: they are programmer errors and panic with a
//! diagnostic instead of limping on with corrupt timing state.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors produced while loading or validating a simulator configuration.
///
/// Every variant names the offending file or controller section so the
/// message points at what to fix.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io { path: String, source: io::Error },
    /// The configuration file is not valid JSON.
    Parse {
        path: String,
        source: serde_json::Error,
    },
    /// The configuration declares no memory controllers.
    NoControllers,
    /// A geometry count in a controller section is zero.
    InvalidGeometry {
        controller: String,
        field: &'static str,
    },
    /// A controller section names a timing profile that is not known.
    UnknownProfile { controller: String, profile: String },
    /// A controller section supplies both a named profile and explicit
    /// timing values.
    AmbiguousTiming { controller: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config file {path}: {source}")
            }
            ConfigError::Parse { path, source } => {
                write!(f, "cannot parse config file {path}: {source}")
            }
            ConfigError::NoControllers => {
                write!(f, "configuration declares no memory controllers")
            }
            ConfigError::InvalidGeometry { controller, field } => {
                write!(f, "controller {controller}: geometry field {field} must be non-zero")
            }
            ConfigError::UnknownProfile {
                controller,
                profile,
            } => {
                write!(f, "controller {controller}: unknown timing profile {profile:?}")
            }
            ConfigError::AmbiguousTiming { controller } => {
                write!(
                    f,
                    "controller {controller}: give either a timing profile or explicit timing values, not both"
                )
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors produced at the `System::read`/`System::write` entry points.
///
/// An invalid address leaves the simulation state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The encoded address does not map onto the configured geometry.
    ///
    /// `field` names the decoded component that fell out of range, `value`
    /// its decoded value and `limit` the configured count it must stay
    /// below.
    InvalidAddress {
        addr: u64,
        field: &'static str,
        value: u64,
        limit: u64,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::InvalidAddress {
                addr,
                field,
                value,
                limit,
            } => write!(
                f,
                "invalid address {addr:#x}: {field} {value} is outside the configured range (limit {limit})"
            ),
        }
    }
}

impl Error for AccessError {}
