//! Adapter implementations for the messaging channel port.

mod memory;

pub use memory::{InMemoryChannel, SentNotification};
