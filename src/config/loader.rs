//! Configuration loading and semantic validation.
//!
//! # Responsibilities
//! - Load the optional TOML file, then apply environment overrides
//! - Semantic validation (serde handles syntactic)
//! - Refuse startup on any missing required field
//!
//! # Design Decisions
//! - Environment variables win over the file, matching how the gateway is
//!   deployed (secrets and service URLs are injected per environment)
//! - Returns all validation errors, not just the first

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;

/// Error type for configuration loading. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration invalid: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: TOML file (if given), then environment overrides,
/// then semantic validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto the loaded config.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    override_from_env(&mut config.listener.bind_address, "GATEWAY_BIND_ADDRESS");
    override_from_env(&mut config.jwt.secret, "JWT_SECRET");
    override_from_env(&mut config.jwt.issuer, "JWT_ISSUER");
    override_from_env(&mut config.jwt.audience, "JWT_AUDIENCE");
    override_from_env(&mut config.services.auth.url, "AUTH_SERVICE_URL");
    override_from_env(&mut config.services.user_service.url, "USER_SERVICE_URL");
    override_from_env(
        &mut config.services.payment_service.url,
        "PAYMENT_SERVICE_URL",
    );
    override_from_env(
        &mut config.services.product_service.url,
        "PRODUCT_SERVICE_URL",
    );
    override_from_env(&mut config.services.order_service.url, "ORDER_SERVICE_URL");
}

fn override_from_env(target: &mut String, var: &str) {
    if let Ok(value) = env::var(var) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

/// Semantic validation. Destination URL syntax is validated later by the
/// cluster registry; this pass only refuses missing required fields.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required: [(&'static str, &str); 9] = [
        ("listener.bind_address", &config.listener.bind_address),
        ("jwt.secret", &config.jwt.secret),
        ("jwt.issuer", &config.jwt.issuer),
        ("jwt.audience", &config.jwt.audience),
        ("services.auth.url", &config.services.auth.url),
        ("services.user_service.url", &config.services.user_service.url),
        (
            "services.payment_service.url",
            &config.services.payment_service.url,
        ),
        (
            "services.product_service.url",
            &config.services.product_service.url,
        ),
        (
            "services.order_service.url",
            &config.services.order_service.url,
        ),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::MissingField(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
