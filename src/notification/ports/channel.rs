//! Messaging-channel capability.

use crate::tenant::domain::ChannelDestination;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for messaging channel operations.
pub type MessagingChannelResult<T> = Result<T, MessagingChannelError>;

/// Sends formatted text to a single destination.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    /// Delivers `text` to `destination`.
    async fn send(&self, destination: &ChannelDestination, text: &str)
    -> MessagingChannelResult<()>;
}

/// Errors returned by messaging channel adapters.
#[derive(Debug, Clone, Error)]
pub enum MessagingChannelError {
    /// The channel refused the message for this destination.
    #[error("destination {destination} rejected the message: {reason}")]
    Rejected {
        /// Destination that refused delivery.
        destination: ChannelDestination,
        /// Channel-provided reason.
        reason: String,
    },

    /// The channel could not be reached.
    #[error("messaging channel unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessagingChannelError {
    /// Wraps a transport failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
