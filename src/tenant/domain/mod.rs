//! Domain model for tenant configuration snapshots.

mod config;
mod error;
mod ids;

pub use config::{PanelCredentials, TenantConfig, TenantConfigDraft};
pub use error::TenantDomainError;
pub use ids::{ChannelDestination, TenantId};
