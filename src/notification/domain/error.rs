//! Error types for notification rendering.

use thiserror::Error;

/// Errors raised while preparing a notification.
///
/// Delivery failures are not errors at this level; they are reported per
/// destination in a dispatch report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// A template failed to render.
    #[error("failed to render '{template}' notification: {reason}")]
    Template {
        /// Template name.
        template: &'static str,
        /// Renderer diagnostic.
        reason: String,
    },
}
