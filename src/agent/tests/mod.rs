//! Unit tests for agent lifecycle services.

mod registry_tests;
mod support;
