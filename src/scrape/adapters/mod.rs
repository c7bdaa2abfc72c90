//! Adapter implementations for the browser port.

mod scripted;

pub use scripted::{ScriptedBrowser, ScriptedSession};
