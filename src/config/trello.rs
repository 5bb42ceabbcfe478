//! Configuration for the card/board backend.

use super::{ConfigError, EnvReader, ServiceKind};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TRELLO_API_KEY";
/// Environment variable holding the API token.
pub const API_TOKEN_ENV: &str = "TRELLO_API_TOKEN";
/// Environment variable holding the board name.
pub const BOARD_NAME_ENV: &str = "TRELLO_BOARD_NAME";

/// Minimum accepted length for API credentials.
const MIN_CREDENTIAL_LEN: usize = 10;

/// Credentials and board selection for the card/board backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrelloConfig {
    api_key: String,
    api_token: String,
    board_name: String,
}

impl TrelloConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_token: impl Into<String>,
        board_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_token: api_token.into(),
            board_name: board_name.into(),
        }
    }

    /// Loads the configuration from environment variables.
    ///
    /// Unset variables load as empty values; call [`Self::validate`] to
    /// reject them.
    #[must_use]
    pub fn from_env(env: &dyn EnvReader) -> Self {
        Self {
            api_key: env.var(API_KEY_ENV).unwrap_or_default(),
            api_token: env.var(API_TOKEN_ENV).unwrap_or_default(),
            board_name: env.var(BOARD_NAME_ENV).unwrap_or_default(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfiguration`] naming every empty
    /// key, or [`ConfigError::InvalidConfiguration`] when a credential is
    /// implausibly short.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("api_key".to_owned());
        }
        if self.api_token.is_empty() {
            missing.push("api_token".to_owned());
        }
        if self.board_name.is_empty() {
            missing.push("board_name".to_owned());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingConfiguration {
                service: ServiceKind::Trello.as_str().to_owned(),
                keys: missing,
            });
        }

        if self.api_key.len() < MIN_CREDENTIAL_LEN {
            return Err(ConfigError::invalid(
                ServiceKind::Trello.as_str(),
                "api_key",
                "API key too short",
            ));
        }
        if self.api_token.len() < MIN_CREDENTIAL_LEN {
            return Err(ConfigError::invalid(
                ServiceKind::Trello.as_str(),
                "api_token",
                "API token too short",
            ));
        }
        Ok(())
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the API token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the name of the board holding all projects.
    #[must_use]
    pub fn board_name(&self) -> &str {
        &self.board_name
    }
}
