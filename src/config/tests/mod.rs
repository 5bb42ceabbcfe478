//! Unit tests for configuration loading and validation.

mod validation_tests;
