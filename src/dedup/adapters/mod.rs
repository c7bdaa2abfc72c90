//! Adapter implementations for the dedup store port.

pub mod filesystem;
pub mod memory;
