//! Scrape client service.

mod client;

pub use client::{ScrapeClient, ScrapeError};
