//! In-memory messaging channel that records deliveries.

use crate::notification::ports::{
    MessagingChannel, MessagingChannelError, MessagingChannelResult,
};
use crate::tenant::domain::ChannelDestination;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Receiving destination.
    pub destination: ChannelDestination,
    /// Delivered text.
    pub text: String,
}

/// Messaging channel that keeps every delivery in memory.
///
/// Destinations can be marked as failing to exercise partial delivery.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannel {
    state: Arc<RwLock<InMemoryChannelState>>,
}

#[derive(Debug, Default)]
struct InMemoryChannelState {
    sent: Vec<SentNotification>,
    failing: HashSet<ChannelDestination>,
}

impl InMemoryChannel {
    /// Creates a channel with no deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future send to `destination` fail.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingChannelError::Unavailable`] when lock acquisition
    /// fails.
    pub fn fail_destination(&self, destination: ChannelDestination) -> MessagingChannelResult<()> {
        let mut state = self.state.write().map_err(|err| {
            MessagingChannelError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.failing.insert(destination);
        Ok(())
    }

    /// Returns all successful deliveries in order.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingChannelError::Unavailable`] when lock acquisition
    /// fails.
    pub fn sent(&self) -> MessagingChannelResult<Vec<SentNotification>> {
        let state = self.state.read().map_err(|err| {
            MessagingChannelError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.sent.clone())
    }
}

#[async_trait]
impl MessagingChannel for InMemoryChannel {
    async fn send(
        &self,
        destination: &ChannelDestination,
        text: &str,
    ) -> MessagingChannelResult<()> {
        let mut state = self.state.write().map_err(|err| {
            MessagingChannelError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        if state.failing.contains(destination) {
            return Err(MessagingChannelError::Rejected {
                destination: destination.clone(),
                reason: "destination marked as failing".to_owned(),
            });
        }
        state.sent.push(SentNotification {
            destination: destination.clone(),
            text: text.to_owned(),
        });
        Ok(())
    }
}
