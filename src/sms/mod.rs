//! SMS record normalisation and one-time-passcode extraction.
//!
//! Raw rows scraped from the vendor console are mapped into [`domain::Message`]
//! values carrying a stable content hash, an optional extracted passcode, and a
//! masked destination address. Everything here is pure; no I/O happens in this
//! module.

pub mod domain;

#[cfg(test)]
mod tests;
