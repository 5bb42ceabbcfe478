//! Construction services for task backends.

mod factory;

pub use factory::{
    BuildServiceError, FactoryError, JiraServiceBuilder, ServiceBuilder, ServiceFactory,
    TrelloServiceBuilder,
};
