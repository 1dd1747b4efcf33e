//! Dispatch decision engine.
//!
//! # Data Flow
//! ```text
//! Received (method, path, optional identity)
//!     → RouteMatched   (routing::RouteTable)   — miss → Rejected(NotFound)
//!     → PolicyEvaluated (policy::Policy)       — deny → Rejected(Unauthorized | Forbidden)
//!     → Dispatched      (cluster destination + untouched request)
//! ```
//!
//! # Design Decisions
//! - Pure decision function: no I/O, no shared mutable state, no locking;
//!   re-entrant across unboundedly many concurrent requests
//! - Unauthorized (no identity) and Forbidden (insufficient role) are
//!   distinct outcomes and stay distinguishable to the caller
//! - Cluster resolution cannot miss at request time; the route table is
//!   validated against the cluster registry when it is built

use axum::http::Method;
use url::Url;

use crate::auth::NormalizedIdentity;
use crate::cluster::ClusterRegistry;
use crate::policy::{AccessDecision, DenyReason};
use crate::routing::RouteTable;

/// Why a request was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No route rule matched the (method, path) pair.
    NotFound,
    /// The matched route requires a policy and no identity was presented.
    Unauthorized,
    /// An identity was presented but its roles do not pass the policy.
    Forbidden,
}

/// Instruction for the external forwarder. The original method, path,
/// headers, and body are forwarded unchanged alongside this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardInstruction {
    /// Destination base address resolved from the route's cluster.
    pub destination: Url,
    /// Matched route, for diagnostics.
    pub route_id: String,
    /// Target cluster id.
    pub cluster_id: String,
    /// Path parameters captured by the matcher, untouched.
    pub params: Vec<(String, String)>,
}

/// The dispatch decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Forward(ForwardInstruction),
    Reject(RejectReason),
}

/// Pure request-dispatch decision function over the immutable registries.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    clusters: ClusterRegistry,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, clusters: ClusterRegistry) -> Self {
        Self { routes, clusters }
    }

    /// Decide whether to forward or reject a request.
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        identity: Option<&NormalizedIdentity>,
    ) -> Dispatch {
        let Some(matched) = self.routes.match_route(method, path) else {
            return Dispatch::Reject(RejectReason::NotFound);
        };

        if let Some(policy) = matched.rule.required_policy {
            match policy.evaluate(identity) {
                AccessDecision::Allow => {}
                AccessDecision::Deny(DenyReason::Unauthenticated) => {
                    return Dispatch::Reject(RejectReason::Unauthorized);
                }
                AccessDecision::Deny(DenyReason::RoleNotPermitted) => {
                    return Dispatch::Reject(RejectReason::Forbidden);
                }
            }
        }

        // Route→cluster references are checked when the table is built, so
        // resolution cannot miss here.
        let destination = self
            .clusters
            .destination(&matched.rule.cluster_id)
            .cloned()
            .expect("route table validated against cluster registry at startup");

        Dispatch::Forward(ForwardInstruction {
            destination,
            route_id: matched.rule.id.clone(),
            cluster_id: matched.rule.cluster_id.clone(),
            params: matched.params,
        })
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn clusters(&self) -> &ClusterRegistry {
        &self.clusters
    }
}
