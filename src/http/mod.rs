//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, bearer extraction)
//!     → [gateway core decides: Forward | Reject]
//!     → server.rs (URI rewrite, upstream client, relay response)
//! ```
//!
//! This layer is the host collaborator for the core: it owns HTTP framing,
//! CORS, the liveness endpoint, and the actual network hop. It owns no
//! routing or authorization logic.

pub mod server;

pub use server::HttpServer;
