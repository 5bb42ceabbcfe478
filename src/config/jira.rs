//! Configuration for the issue-tracker backend.

use super::{ConfigError, EnvReader, ServiceKind};

/// Environment variable holding the server URL.
pub const SERVER_URL_ENV: &str = "JIRA_SERVER_URL";
/// Environment variable holding the account username.
pub const USERNAME_ENV: &str = "JIRA_USERNAME";
/// Environment variable holding the API token.
pub const API_TOKEN_ENV: &str = "JIRA_API_TOKEN";
/// Environment variable holding the default project key.
pub const PROJECT_KEY_ENV: &str = "JIRA_PROJECT_KEY";

/// Minimum accepted length for a project key.
const MIN_PROJECT_KEY_LEN: usize = 2;

/// Server coordinates and credentials for the issue-tracker backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraConfig {
    server_url: String,
    username: String,
    api_token: String,
    project_key: String,
}

impl JiraConfig {
    /// Creates a configuration from explicit values.
    ///
    /// Trailing slashes on the server URL are trimmed.
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            username: username.into(),
            api_token: api_token.into(),
            project_key: project_key.into(),
        }
    }

    /// Loads the configuration from environment variables.
    ///
    /// Unset variables load as empty values; call [`Self::validate`] to
    /// reject them.
    #[must_use]
    pub fn from_env(env: &dyn EnvReader) -> Self {
        Self::new(
            env.var(SERVER_URL_ENV).unwrap_or_default(),
            env.var(USERNAME_ENV).unwrap_or_default(),
            env.var(API_TOKEN_ENV).unwrap_or_default(),
            env.var(PROJECT_KEY_ENV).unwrap_or_default(),
        )
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfiguration`] naming every empty
    /// key, or [`ConfigError::InvalidConfiguration`] when the server URL
    /// has no HTTP scheme or the project key is implausibly short.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.server_url.is_empty() {
            missing.push("server_url".to_owned());
        }
        if self.username.is_empty() {
            missing.push("username".to_owned());
        }
        if self.api_token.is_empty() {
            missing.push("api_token".to_owned());
        }
        if self.project_key.is_empty() {
            missing.push("project_key".to_owned());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingConfiguration {
                service: ServiceKind::Jira.as_str().to_owned(),
                keys: missing,
            });
        }

        let has_scheme =
            self.server_url.starts_with("http://") || self.server_url.starts_with("https://");
        if !has_scheme {
            return Err(ConfigError::invalid(
                ServiceKind::Jira.as_str(),
                "server_url",
                "Must start with http:// or https://",
            ));
        }
        if self.project_key.len() < MIN_PROJECT_KEY_LEN {
            return Err(ConfigError::invalid(
                ServiceKind::Jira.as_str(),
                "project_key",
                "Project key too short",
            ));
        }
        Ok(())
    }

    /// Returns the server URL without a trailing slash.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns the account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the API token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the default project key.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.project_key
    }
}
