//! Observability subsystem.
//!
//! Structured logging via tracing; the request ID set by the HTTP layer
//! flows through every dispatch event.

pub mod logging;
