//! Backend selection and construction.
//!
//! The factory owns a registry mapping backend identifiers to builders. It
//! is constructed once at process start and passed by reference; nothing in
//! this module keeps global mutable state, and constructed services are not
//! cached across calls.

use crate::config::{
    ACTIVE_SERVICE_ENV, ConfigError, EnvReader, ProcessEnv, ServiceConfig, ServiceKind,
};
use crate::task::adapters::jira::{HttpIssueTrackerApi, JiraTaskService};
use crate::task::adapters::trello::{HttpCardBoardApi, TrelloTaskService};
use crate::task::ports::{TaskService, TaskServiceError};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while building a backend service instance.
#[derive(Debug, Error)]
pub enum BuildServiceError {
    /// The supplied configuration belongs to a different backend.
    #[error("configuration is for service '{actual}', expected '{expected}'")]
    ConfigMismatch {
        /// Backend the builder constructs.
        expected: ServiceKind,
        /// Backend the configuration belongs to.
        actual: ServiceKind,
    },

    /// The backend adapter failed to construct.
    #[error(transparent)]
    Service(#[from] TaskServiceError),
}

/// Errors raised by the service factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend rejected construction; usually bad credentials.
    #[error("Authentication failed with {service} backend. Please check your credentials.")]
    Authentication {
        /// Backend that failed to construct.
        service: String,
        /// Underlying construction failure.
        #[source]
        source: BuildServiceError,
    },

    /// Every candidate backend failed to construct.
    #[error("No valid service configuration found. Last error: {last}")]
    NoServiceAvailable {
        /// The failure from the final fallback attempt.
        last: Box<FactoryError>,
    },
}

/// Constructs a task service from a validated configuration.
#[async_trait]
pub trait ServiceBuilder: Send + Sync {
    /// Builds the service instance.
    ///
    /// # Errors
    ///
    /// Returns [`BuildServiceError::ConfigMismatch`] when handed another
    /// backend's configuration, or [`BuildServiceError::Service`] when the
    /// adapter fails to construct.
    async fn build(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn TaskService>, BuildServiceError>;
}

/// Builder for the card/board backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrelloServiceBuilder;

#[async_trait]
impl ServiceBuilder for TrelloServiceBuilder {
    async fn build(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn TaskService>, BuildServiceError> {
        let ServiceConfig::Trello(trello) = config else {
            return Err(BuildServiceError::ConfigMismatch {
                expected: ServiceKind::Trello,
                actual: config.kind(),
            });
        };
        let api = HttpCardBoardApi::connect(trello).await.map_err(|err| {
            BuildServiceError::Service(TaskServiceError::connection("Trello", err.to_string()))
        })?;
        let service = TrelloTaskService::connect(Arc::new(api), Arc::new(DefaultClock)).await?;
        Ok(Arc::new(service))
    }
}

/// Builder for the issue-tracker backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct JiraServiceBuilder;

#[async_trait]
impl ServiceBuilder for JiraServiceBuilder {
    async fn build(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn TaskService>, BuildServiceError> {
        let ServiceConfig::Jira(jira) = config else {
            return Err(BuildServiceError::ConfigMismatch {
                expected: ServiceKind::Jira,
                actual: config.kind(),
            });
        };
        let api = HttpIssueTrackerApi::new(jira).map_err(|err| {
            BuildServiceError::Service(TaskServiceError::connection("JIRA", err.to_string()))
        })?;
        let service = JiraTaskService::connect(Arc::new(api), Arc::new(DefaultClock)).await?;
        Ok(Arc::new(service))
    }
}

/// Factory selecting, configuring, and constructing backend services.
pub struct ServiceFactory {
    env: Arc<dyn EnvReader>,
    builders: HashMap<String, Arc<dyn ServiceBuilder>>,
}

impl ServiceFactory {
    /// Creates a factory with the built-in backends registered, reading
    /// configuration from the given environment.
    #[must_use]
    pub fn new(env: Arc<dyn EnvReader>) -> Self {
        let mut factory = Self {
            env,
            builders: HashMap::new(),
        };
        factory.register(ServiceKind::Trello.as_str(), Arc::new(TrelloServiceBuilder));
        factory.register(ServiceKind::Jira.as_str(), Arc::new(JiraServiceBuilder));
        factory
    }

    /// Creates a factory reading configuration from the process
    /// environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }

    /// Registers (or replaces) a builder under a backend identifier.
    ///
    /// This is the extensibility hook for additional backends; the trait
    /// bound guarantees the builder produces a complete service contract
    /// implementation.
    pub fn register(&mut self, name: impl Into<String>, builder: Arc<dyn ServiceBuilder>) {
        self.builders.insert(normalize(&name.into()), builder);
    }

    /// Removes a builder. Returns `true` when one was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.builders.remove(&normalize(name)).is_some()
    }

    /// Returns the registered backend identifiers, sorted.
    #[must_use]
    pub fn supported_services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Reports whether a backend identifier has a registered builder.
    #[must_use]
    pub fn is_supported(&self, name: &str) -> bool {
        self.builders.contains_key(&normalize(name))
    }

    /// Loads a backend's configuration from the environment and validates
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when required keys are missing or values are
    /// malformed.
    pub fn validate_config(&self, kind: ServiceKind) -> Result<(), ConfigError> {
        ServiceConfig::from_env(kind, &*self.env).validate()
    }

    /// Returns the built-in backends whose environment configuration
    /// validates.
    #[must_use]
    pub fn available_services(&self) -> Vec<ServiceKind> {
        ServiceKind::FALLBACK_ORDER
            .into_iter()
            .filter(|kind| self.validate_config(*kind).is_ok())
            .collect()
    }

    /// Creates a backend service by identifier.
    ///
    /// When no configuration is supplied it is loaded from the environment
    /// and validated first. Construction failures are reported as
    /// [`FactoryError::Authentication`] wrapping the cause.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Config`] for unknown identifiers and
    /// configuration problems, or [`FactoryError::Authentication`] when the
    /// backend fails to construct.
    pub async fn create_service(
        &self,
        name: &str,
        config: Option<ServiceConfig>,
    ) -> Result<Arc<dyn TaskService>, FactoryError> {
        let normalized = normalize(name);
        let builder = self
            .builders
            .get(&normalized)
            .ok_or_else(|| ConfigError::UnknownServiceType(name.to_owned()))?;

        let resolved = match config {
            Some(supplied) => {
                supplied.validate()?;
                supplied
            }
            None => {
                let kind = ServiceKind::try_from(normalized.as_str())
                    .map_err(|_| ConfigError::ConfigNotFound(normalized.clone()))?;
                let loaded = ServiceConfig::from_env(kind, &*self.env);
                loaded.validate()?;
                loaded
            }
        };

        info!(service = %normalized, "constructing task service");
        builder
            .build(&resolved)
            .await
            .map_err(|source| FactoryError::Authentication {
                service: normalized,
                source,
            })
    }

    /// Creates the default backend service.
    ///
    /// Tries the backend named by `ACTIVE_TASK_SERVICE` first, then falls
    /// back through the fixed preference order, returning the first backend
    /// that constructs successfully.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::NoServiceAvailable`] referencing the last
    /// failure when no backend can be constructed.
    pub async fn create_default_service(&self) -> Result<Arc<dyn TaskService>, FactoryError> {
        if let Some(active) = self
            .env
            .var(ACTIVE_SERVICE_ENV)
            .filter(|value| !value.trim().is_empty())
        {
            match self.create_service(&active, None).await {
                Ok(service) => return Ok(service),
                Err(err) => {
                    warn!(service = %active, error = %err, "active service unavailable, falling back");
                }
            }
        }

        let mut last_error: Option<FactoryError> = None;
        for kind in ServiceKind::FALLBACK_ORDER {
            match self.create_service(kind.as_str(), None).await {
                Ok(service) => return Ok(service),
                Err(err) => {
                    warn!(service = %kind, error = %err, "fallback service unavailable");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.map_or_else(
            || FactoryError::Config(ConfigError::ConfigNotFound("default".to_owned())),
            |err| FactoryError::NoServiceAvailable {
                last: Box::new(err),
            },
        ))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
