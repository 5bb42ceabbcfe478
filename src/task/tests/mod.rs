//! Unit tests for the task module.
//!
//! Tests are organised by layer: pure domain behavior, each backend
//! adapter running against its in-memory API port, and factory selection
//! and fallback.

mod trello_service_tests;
