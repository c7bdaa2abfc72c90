//! Vendor console scraping over a browser-session capability.
//!
//! The browser engine itself is external; [`ports::BrowserSession`] is the
//! narrow capability this crate drives. [`services::ScrapeClient`] performs the
//! console login (including the arithmetic captcha) and fetches the latest SMS
//! rows by capturing the console's data response.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The scrape client in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
