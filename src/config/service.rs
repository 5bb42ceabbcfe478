//! Sum type over the per-backend configurations.

use super::{ConfigError, EnvReader, JiraConfig, ServiceKind, TrelloConfig};

/// Configuration for one of the built-in backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceConfig {
    /// Card/board backend settings.
    Trello(TrelloConfig),
    /// Issue-tracker backend settings.
    Jira(JiraConfig),
}

impl ServiceConfig {
    /// Loads the configuration for the given backend from environment
    /// variables. The result is not yet validated.
    #[must_use]
    pub fn from_env(kind: ServiceKind, env: &dyn EnvReader) -> Self {
        match kind {
            ServiceKind::Trello => Self::Trello(TrelloConfig::from_env(env)),
            ServiceKind::Jira => Self::Jira(JiraConfig::from_env(env)),
        }
    }

    /// Returns the backend this configuration belongs to.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        match self {
            Self::Trello(_) => ServiceKind::Trello,
            Self::Jira(_) => ServiceKind::Jira,
        }
    }

    /// Validates the wrapped configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] from the wrapped configuration's
    /// validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Trello(config) => config.validate(),
            Self::Jira(config) => config.validate(),
        }
    }
}

impl From<TrelloConfig> for ServiceConfig {
    fn from(config: TrelloConfig) -> Self {
        Self::Trello(config)
    }
}

impl From<JiraConfig> for ServiceConfig {
    fn from(config: JiraConfig) -> Self {
        Self::Jira(config)
    }
}
