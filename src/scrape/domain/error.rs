//! Domain errors and login step labels.

use std::fmt;
use thiserror::Error;

/// Errors returned while building scrape domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeDomainError {
    /// A captcha pattern failed to compile.
    #[error("invalid captcha pattern: {0}")]
    InvalidPattern(String),
}

/// The login step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStep {
    /// Opening a browser session.
    OpenSession,
    /// Loading the login page.
    Navigate,
    /// Reading the rendered page for the captcha challenge.
    ReadChallenge,
    /// Filling the credential and captcha fields.
    FillForm,
    /// Submitting the form and awaiting navigation.
    Submit,
}

impl LoginStep {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenSession => "open_session",
            Self::Navigate => "navigate",
            Self::ReadChallenge => "read_challenge",
            Self::FillForm => "fill_form",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for LoginStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
