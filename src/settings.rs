//! Process-wide runtime settings.
//!
//! Settings are read from a JSON document. Every field has a default, so an
//! empty object (or no file at all) yields the standard cadences and limits.

use crate::dedup::domain::{DedupPolicy, DedupPolicyError};
use crate::scrape::domain::{PanelSelectors, ScrapeOptions};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors returned while loading runtime settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// I/O failure.
        source: std::io::Error,
    },

    /// The settings document is not valid JSON for this schema.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A duration that must be positive is zero.
    #[error("setting '{0}' must be greater than zero")]
    ZeroDuration(&'static str),

    /// The dedup limits are inconsistent.
    #[error(transparent)]
    Dedup(#[from] DedupPolicyError),
}

/// Cadences, timeouts and console selectors shared by all agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSettings {
    /// Interval between health checks.
    pub health_check_interval_ms: u64,
    /// Idle time after which a session is considered stale.
    pub stale_after_ms: u64,
    /// Deadline for capturing the report data response.
    pub capture_timeout_ms: u64,
    /// Limit for page loads.
    pub navigation_timeout_ms: u64,
    /// Limit for waiting on form fields.
    pub selector_timeout_ms: u64,
    /// Pause after loading the login page.
    pub page_settle_delay_ms: u64,
    /// Limit for closing a browser session.
    pub session_close_timeout_ms: u64,
    /// Dedup cache size that triggers compaction.
    pub dedup_capacity: usize,
    /// Dedup entries kept after compaction.
    pub dedup_retain: usize,
    /// Console selectors and scripts.
    pub selectors: PanelSelectors,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        let dedup = DedupPolicy::default();
        Self {
            health_check_interval_ms: 60_000,
            stale_after_ms: 300_000,
            capture_timeout_ms: 15_000,
            navigation_timeout_ms: 30_000,
            selector_timeout_ms: 10_000,
            page_settle_delay_ms: 2_000,
            session_close_timeout_ms: 5_000,
            dedup_capacity: dedup.capacity(),
            dedup_retain: dedup.retain(),
            selectors: PanelSelectors::default(),
        }
    }
}

impl RuntimeSettings {
    /// Parses and validates settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the document is malformed or invalid.
    pub fn from_json_str(document: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and validates settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read, otherwise
    /// as [`Self::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        let read_error = |source: std::io::Error| SettingsError::Read {
            path: path.to_string(),
            source,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "settings path must name a file",
            ))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let document = dir.read_to_string(file_name).map_err(read_error)?;
        Self::from_json_str(&document)
    }

    /// Checks that durations are positive and dedup limits are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroDuration`] or [`SettingsError::Dedup`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("health_check_interval_ms", self.health_check_interval_ms),
            ("stale_after_ms", self.stale_after_ms),
            ("capture_timeout_ms", self.capture_timeout_ms),
            ("navigation_timeout_ms", self.navigation_timeout_ms),
            ("selector_timeout_ms", self.selector_timeout_ms),
            ("session_close_timeout_ms", self.session_close_timeout_ms),
        ] {
            if value == 0 {
                return Err(SettingsError::ZeroDuration(name));
            }
        }
        self.dedup_policy()?;
        Ok(())
    }

    /// Returns the dedup cache limits.
    ///
    /// # Errors
    ///
    /// Returns [`DedupPolicyError`] when the limits are inconsistent.
    pub const fn dedup_policy(&self) -> Result<DedupPolicy, DedupPolicyError> {
        DedupPolicy::new(self.dedup_capacity, self.dedup_retain)
    }

    /// Returns the health-check cadence.
    #[must_use]
    pub const fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    /// Returns the staleness threshold.
    #[must_use]
    pub const fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    /// Builds the scrape client options.
    #[must_use]
    pub fn scrape_options(&self) -> ScrapeOptions {
        ScrapeOptions {
            selectors: self.selectors.clone(),
            navigation_timeout: Duration::from_millis(self.navigation_timeout_ms),
            selector_timeout: Duration::from_millis(self.selector_timeout_ms),
            capture_timeout: Duration::from_millis(self.capture_timeout_ms),
            page_settle_delay: Duration::from_millis(self.page_settle_delay_ms),
            session_close_timeout: Duration::from_millis(self.session_close_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    #[rstest]
    fn empty_document_yields_defaults() {
        let settings = RuntimeSettings::from_json_str("{}").expect("defaults are valid");
        assert_eq!(settings, RuntimeSettings::default());
        assert_eq!(settings.health_check_interval(), Duration::from_secs(60));
        assert_eq!(settings.stale_after(), Duration::from_secs(300));
        assert_eq!(
            settings.scrape_options().capture_timeout,
            Duration::from_secs(15)
        );
    }

    #[rstest]
    fn partial_document_overrides_named_fields() {
        let settings = RuntimeSettings::from_json_str(
            r#"{"stale_after_ms": 1000, "selectors": {"records_endpoint": "cdr_feed"}}"#,
        )
        .expect("valid settings");
        assert_eq!(settings.stale_after(), Duration::from_secs(1));
        assert_eq!(settings.selectors.records_endpoint, "cdr_feed");
        assert_eq!(settings.selectors.username_input, PanelSelectors::default().username_input);
    }

    #[rstest]
    #[case(r#"{"capture_timeout_ms": 0}"#)]
    #[case(r#"{"dedup_capacity": 10, "dedup_retain": 20}"#)]
    #[case(r#"{"poll_everything": true}"#)]
    #[case("not json")]
    fn invalid_documents_are_rejected(#[case] document: &str) {
        assert!(RuntimeSettings::from_json_str(document).is_err());
    }

    #[rstest]
    fn load_reads_file_from_disk() {
        let temp = tempfile::tempdir().expect("temporary directory");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
        let path = root.join("settings.json");
        std::fs::write(&path, r#"{"health_check_interval_ms": 5000}"#).expect("write settings");

        let settings = RuntimeSettings::load(&path).expect("settings load");

        assert_eq!(settings.health_check_interval(), Duration::from_secs(5));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let error = RuntimeSettings::load(Utf8Path::new("/nonexistent/otp-relay/settings.json"))
            .expect_err("missing file");
        assert!(matches!(error, SettingsError::Read { .. }));
    }
}
