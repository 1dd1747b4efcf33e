//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from an optional TOML
//! file; every field can also arrive through an environment variable (see
//! `loader`). The gateway refuses to start on a missing required field.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Bearer token validation settings.
    pub jwt: JwtConfig,

    /// Backend service destinations, one per cluster.
    pub services: ServicesConfig,

    /// Timeout configuration for the host runtime.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Bearer token validation settings. All fields are required.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct JwtConfig {
    /// Symmetric signing key (HS256).
    pub secret: String,

    /// Exact `iss` claim value to accept.
    pub issuer: String,

    /// `aud` claim value that must be present.
    pub audience: String,
}

/// One backend service destination.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceEndpoint {
    /// Absolute base URL of the service.
    pub url: String,
}

/// Destinations for every cluster the route table references.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServicesConfig {
    pub auth: ServiceEndpoint,
    pub user_service: ServiceEndpoint,
    pub payment_service: ServiceEndpoint,
    pub product_service: ServiceEndpoint,
    pub order_service: ServiceEndpoint,
}

/// Timeout configuration for the host runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
