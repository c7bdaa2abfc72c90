//! Pluggable captcha strategies.

use super::ScrapeDomainError;
use regex::Regex;
use std::fmt;

/// `<int> + <int>` as rendered on the login page.
const SUM_PATTERN: &str = r"(\d+)\s*\+\s*(\d+)";

/// Solves the login page's captcha challenge from its rendered text.
pub trait CaptchaSolver: Send + Sync + fmt::Debug {
    /// Returns the answer to type, or `None` when no challenge is recognised.
    fn solve(&self, page_text: &str) -> Option<String>;
}

/// Solves deterministic addition challenges such as `7 + 12 = ?`.
#[derive(Debug, Clone)]
pub struct ArithmeticCaptchaSolver {
    pattern: Regex,
}

impl ArithmeticCaptchaSolver {
    /// Creates the solver.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeDomainError::InvalidPattern`] if the built-in pattern
    /// fails to compile.
    pub fn new() -> Result<Self, ScrapeDomainError> {
        let pattern = Regex::new(SUM_PATTERN)
            .map_err(|err| ScrapeDomainError::InvalidPattern(err.to_string()))?;
        Ok(Self { pattern })
    }
}

impl CaptchaSolver for ArithmeticCaptchaSolver {
    fn solve(&self, page_text: &str) -> Option<String> {
        let captures = self.pattern.captures(page_text)?;
        let left: u64 = captures.get(1)?.as_str().parse().ok()?;
        let right: u64 = captures.get(2)?.as_str().parse().ok()?;
        left.checked_add(right).map(|sum| sum.to_string())
    }
}
