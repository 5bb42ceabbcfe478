//! Error types for configuration loading and validation.

use super::ParseServiceKindError;
use thiserror::Error;

/// Errors raised while loading or validating backend configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required keys are unset or empty.
    #[error("Missing required configuration for {service}: {}", .keys.join(", "))]
    MissingConfiguration {
        /// Backend the configuration belongs to.
        service: String,
        /// Names of the keys that are missing.
        keys: Vec<String>,
    },

    /// A key is present but its value is malformed.
    #[error("Invalid configuration for {service}.{key}: {reason}")]
    InvalidConfiguration {
        /// Backend the configuration belongs to.
        service: String,
        /// Offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The requested backend identifier is not recognized.
    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),

    /// No configuration source exists for the requested backend.
    #[error("No configuration found for service '{0}'")]
    ConfigNotFound(String),
}

impl ConfigError {
    /// Builds an invalid-configuration error.
    pub fn invalid(
        service: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            service: service.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<ParseServiceKindError> for ConfigError {
    fn from(err: ParseServiceKindError) -> Self {
        Self::UnknownServiceType(err.0)
    }
}
