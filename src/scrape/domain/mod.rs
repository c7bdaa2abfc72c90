//! Domain model for console scraping.

mod captcha;
mod error;
mod ids;
mod options;

pub use captcha::{ArithmeticCaptchaSolver, CaptchaSolver};
pub use error::{LoginStep, ScrapeDomainError};
pub use ids::SessionId;
pub use options::{PanelSelectors, ResponseCapture, ScrapeOptions};
