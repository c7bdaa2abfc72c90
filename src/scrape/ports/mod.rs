//! Port contracts for the browser-automation engine.

mod browser;

pub use browser::{BrowserError, BrowserLauncher, BrowserResult, BrowserSession};
