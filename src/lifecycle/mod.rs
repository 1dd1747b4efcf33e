//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Ordered startup: config first, then registries, then the listener —
//!   a defective registry refuses startup before any socket is bound
//! - Shutdown is a broadcast: the run loop stops accepting and drains

pub mod shutdown;

pub use shutdown::Shutdown;
