//! Ordered one-time-passcode extraction strategies.

use super::SmsDomainError;
use regex::Regex;
use serde::Serialize;

/// Labelled passcode such as `code: 4821`.
///
/// The separator after the label may be a colon, whitespace, or both, so
/// `OTP 123456` also counts as labelled.
const LABELLED_PATTERN: &str = r"(?i)\b(?:code|otp|verification)[:\s]+(\d{3,8})\b";
/// Bare run of four to eight digits.
const BARE_DIGITS_PATTERN: &str = r"\b(\d{4,8})\b";
/// Hyphenated `ddd-ddd` form.
const HYPHENATED_PATTERN: &str = r"\b(\d{3}-\d{3})\b";

/// A named pattern that may yield a passcode from a message body.
///
/// The first capture group is the passcode; without one, the whole match is.
#[derive(Debug, Clone)]
pub struct ExtractionStrategy {
    name: &'static str,
    pattern: Regex,
}

impl ExtractionStrategy {
    /// Compiles a named strategy.
    ///
    /// # Errors
    ///
    /// Returns [`SmsDomainError::InvalidPattern`] when the pattern does not
    /// compile.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, SmsDomainError> {
        let compiled = Regex::new(pattern).map_err(|err| SmsDomainError::InvalidPattern {
            name,
            reason: err.to_string(),
        })?;
        Ok(Self {
            name,
            pattern: compiled,
        })
    }

    /// Returns the strategy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the first passcode this strategy finds in `body`.
    #[must_use]
    pub fn find(&self, body: &str) -> Option<String> {
        let captures = self.pattern.captures(body)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|matched| matched.as_str().to_owned())
    }
}

/// A passcode together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedOtp {
    strategy: &'static str,
    code: String,
}

impl ExtractedOtp {
    /// Returns the name of the strategy that matched.
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// Returns the extracted passcode.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// First-match-wins chain of extraction strategies.
///
/// Precedence is list order, not position in the text: an earlier strategy
/// wins even when a later one matches closer to the start of the body.
#[derive(Debug, Clone)]
pub struct OtpExtractor {
    strategies: Vec<ExtractionStrategy>,
}

impl OtpExtractor {
    /// Creates an extractor from strategies in priority order.
    #[must_use]
    pub const fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    /// Builds the standard chain: labelled, bare digits, hyphenated.
    ///
    /// # Errors
    ///
    /// Returns [`SmsDomainError::InvalidPattern`] if a built-in pattern fails
    /// to compile.
    pub fn standard() -> Result<Self, SmsDomainError> {
        Ok(Self::new(vec![
            ExtractionStrategy::new("labelled", LABELLED_PATTERN)?,
            ExtractionStrategy::new("bare_digits", BARE_DIGITS_PATTERN)?,
            ExtractionStrategy::new("hyphenated", HYPHENATED_PATTERN)?,
        ]))
    }

    /// Returns the strategy names in priority order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(ExtractionStrategy::name)
    }

    /// Runs the strategies in order and returns the first passcode found.
    #[must_use]
    pub fn extract(&self, body: &str) -> Option<ExtractedOtp> {
        self.strategies.iter().find_map(|strategy| {
            strategy.find(body).map(|code| ExtractedOtp {
                strategy: strategy.name(),
                code,
            })
        })
    }
}
