//! Port contracts for outbound messaging.

mod channel;

pub use channel::{MessagingChannel, MessagingChannelError, MessagingChannelResult};
