//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (JWT_SECRET, *_SERVICE_URL, ...)
//!     → loader.rs (semantic validation — all errors reported)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; registries built from it never change
//! - Missing required fields refuse startup, never a partial registry

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError, ValidationError};
pub use schema::{
    GatewayConfig, JwtConfig, ListenerConfig, ObservabilityConfig, ServiceEndpoint,
    ServicesConfig, TimeoutConfig,
};
