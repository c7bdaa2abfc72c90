//! Notification fan-out service.

mod dispatcher;

pub use dispatcher::{DeliveryFailure, DispatchReport, NotificationDispatcher};
