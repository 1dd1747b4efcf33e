//! Gateway core assembly.
//!
//! # Data Flow
//! ```text
//! GatewayConfig
//!     → routes.rs (fixed route + cluster catalogue)
//!     → cluster::ClusterRegistry (eager URL validation)
//!     → routing::RouteTable (eager duplicate/reference validation)
//!     → GatewayCore { Dispatcher, TokenValidator }
//!
//! Per request (driven by the host runtime):
//!     bearer token?  → validate_token → identity | failure
//!     method + path  → dispatch       → Forward | Reject
//! ```
//!
//! # Design Decisions
//! - All registry validation happens here, before traffic is accepted; a
//!   defective table refuses startup rather than failing per-request
//! - The core is synchronous and share-nothing: one immutable value, used
//!   concurrently by any number of in-flight requests

pub mod routes;

use axum::http::Method;

use crate::auth::{NormalizedIdentity, TokenValidator, ValidationFailure};
use crate::cluster::{ClusterError, ClusterRegistry};
use crate::config::GatewayConfig;
use crate::dispatch::{Dispatch, Dispatcher};
use crate::routing::{RouteTable, RouteTableError};

/// Why the registries refused to build. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Routes(#[from] RouteTableError),
}

/// A parsed inbound request, as handed over by the host runtime.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub bearer_token: Option<String>,
}

/// The dispatch & authorization engine: immutable registries plus the
/// token validator, built once from configuration.
#[derive(Debug)]
pub struct GatewayCore {
    dispatcher: Dispatcher,
    validator: TokenValidator,
}

impl GatewayCore {
    /// Build the core from validated configuration. Every configuration
    /// defect (duplicate route key, unknown cluster, malformed destination
    /// URL or pattern) surfaces here, before the first request.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RegistryError> {
        let clusters = ClusterRegistry::new(routes::build_clusters(&config.services))?;
        let table = RouteTable::new(routes::build_routes()?, &clusters)?;

        tracing::info!(
            routes = table.rules().len(),
            clusters = clusters.len(),
            "gateway registries built"
        );

        Ok(Self {
            dispatcher: Dispatcher::new(table, clusters),
            validator: TokenValidator::new(&config.jwt),
        })
    }

    /// Validate a raw bearer token into a per-request identity.
    pub fn validate_token(
        &self,
        raw_token: &str,
    ) -> Result<NormalizedIdentity, ValidationFailure> {
        self.validator.validate(raw_token)
    }

    /// Decide whether to forward or reject a request.
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        identity: Option<&NormalizedIdentity>,
    ) -> Dispatch {
        self.dispatcher.dispatch(method, path, identity)
    }

    /// The full per-request control flow: validate the bearer token if one
    /// is present, then dispatch. An invalid token demotes the caller to
    /// anonymous; routes with a required policy then reject Unauthorized.
    pub fn handle(&self, request: &RequestDescriptor) -> Dispatch {
        let identity = match request.bearer_token.as_deref() {
            Some(token) => match self.validator.validate(token) {
                Ok(identity) => Some(identity),
                Err(failure) => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        failure = %failure,
                        "bearer token rejected"
                    );
                    None
                }
            },
            None => None,
        };
        self.dispatch(&request.method, &request.path, identity.as_ref())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.jwt.secret = "test-secret".into();
        config.jwt.issuer = "Issuer".into();
        config.jwt.audience = "Audience".into();
        config.services.auth.url = "http://localhost:9000".into();
        config.services.user_service.url = "http://localhost:9001".into();
        config.services.payment_service.url = "http://localhost:9002".into();
        config.services.product_service.url = "http://localhost:9003".into();
        config.services.order_service.url = "http://localhost:9004".into();
        config
    }

    #[test]
    fn core_builds_from_complete_config() {
        assert!(GatewayCore::from_config(&config()).is_ok());
    }

    #[test]
    fn malformed_destination_refuses_startup() {
        let mut config = config();
        config.services.order_service.url = "not-a-valid-url".into();
        let err = GatewayCore::from_config(&config).unwrap_err();
        assert!(matches!(err, RegistryError::Cluster(_)));
    }

    #[test]
    fn handle_treats_invalid_token_as_anonymous() {
        let core = GatewayCore::from_config(&config()).unwrap();

        // Public route still forwards with a garbage token attached.
        let open = RequestDescriptor {
            method: Method::POST,
            path: "/api/users".into(),
            bearer_token: Some("garbage".into()),
        };
        assert!(matches!(core.handle(&open), Dispatch::Forward(_)));

        // Gated route rejects Unauthorized, not Forbidden.
        let gated = RequestDescriptor {
            method: Method::GET,
            path: "/api/users".into(),
            bearer_token: Some("garbage".into()),
        };
        assert!(matches!(
            core.handle(&gated),
            Dispatch::Reject(crate::dispatch::RejectReason::Unauthorized)
        ));
    }
}
