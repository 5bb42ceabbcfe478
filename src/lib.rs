//! Taskbridge: a uniform task-management layer over remote tracking backends.
//!
//! This crate exposes one service contract (add, query, transition, and
//! delete tasks, and manage their checklists) implemented against two
//! remote project-tracking systems: a card/board service and an issue
//! tracker. A factory selects, configures, and constructs the backend
//! adapter from environment-sourced configuration with ordered fallback.
//!
//! # Architecture
//!
//! Taskbridge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task/checklist types with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for the service contract and the
//!   remote backend APIs
//! - **Adapters**: Concrete implementations of ports (HTTP backends,
//!   in-memory test doubles)
//!
//! # Modules
//!
//! - [`config`]: Per-backend configuration with eager validation
//! - [`task`]: Domain model, service contract, backend adapters, and the
//!   service factory

pub mod config;
pub mod task;
