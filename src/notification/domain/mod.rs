//! Domain model for notification rendering.

mod error;
mod template;

pub use error::NotificationError;
pub use template::NotificationTemplates;
