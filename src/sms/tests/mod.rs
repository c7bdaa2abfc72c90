//! Unit tests for SMS normalisation.

mod extraction_tests;
