//! Task management over pluggable remote tracking backends.
//!
//! This module defines the uniform task-service contract, the domain model
//! it speaks, the two backend adapters (card board and issue tracker), and
//! the factory that selects and constructs a backend from configuration.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Construction services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
