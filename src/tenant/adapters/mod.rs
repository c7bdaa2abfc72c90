//! Adapter implementations for the tenant configuration port.

pub mod memory;
