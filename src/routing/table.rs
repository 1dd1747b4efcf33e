//! Route registry and lookup.
//!
//! # Responsibilities
//! - Hold the compiled route rules
//! - Validate the table eagerly (duplicates, cluster references)
//! - Look up the matching rule for a (method, path) pair
//!
//! # Design Decisions
//! - Immutable after construction; shared freely across requests
//! - Rules are frozen in longest-static-prefix order at build time, so the
//!   request-time scan is a plain first-match-wins pass
//! - Explicit `None` on no match rather than a silent default route

use std::collections::HashSet;

use axum::http::Method;

use crate::cluster::ClusterRegistry;
use crate::policy::Policy;
use crate::routing::pattern::{PathPattern, PatternError};

/// A single route rule, registered at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct RouteRule {
    /// Unique identifier, for diagnostics and logs.
    pub id: String,

    /// Compiled path template.
    pub pattern: PathPattern,

    /// HTTP methods this rule matches. Never empty.
    pub methods: Vec<Method>,

    /// Target cluster; must exist in the cluster registry.
    pub cluster_id: String,

    /// Authorization policy gate; `None` means routing only, no check.
    pub required_policy: Option<Policy>,
}

impl RouteRule {
    pub fn new(
        id: &str,
        path_pattern: &str,
        methods: &[Method],
        cluster_id: &str,
        required_policy: Option<Policy>,
    ) -> Result<Self, RouteTableError> {
        let pattern = PathPattern::parse(path_pattern).map_err(|source| {
            RouteTableError::InvalidPattern {
                route: id.to_string(),
                source,
            }
        })?;
        if methods.is_empty() {
            return Err(RouteTableError::EmptyMethodSet {
                route: id.to_string(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            pattern,
            methods: methods.to_vec(),
            cluster_id: cluster_id.to_string(),
            required_policy,
        })
    }
}

/// Why the route table refused to build. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("route '{route}' has a malformed path pattern")]
    InvalidPattern {
        route: String,
        #[source]
        source: PatternError,
    },

    #[error("route '{route}' has an empty method set")]
    EmptyMethodSet { route: String },

    #[error("duplicate route key: {method} {pattern}")]
    DuplicateRouteKey { pattern: String, method: Method },

    #[error("route '{route}' references unknown cluster '{cluster}'")]
    UnknownCluster { route: String, cluster: String },
}

/// A successful route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub rule: &'a RouteRule,
    /// Captured path parameters, handed to the forwarder untouched.
    pub params: Vec<(String, String)>,
}

/// The ordered, validated route table.
#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build the table, validating every rule against the cluster registry
    /// and rejecting duplicate `(pattern, method)` pairs.
    pub fn new(
        mut rules: Vec<RouteRule>,
        clusters: &ClusterRegistry,
    ) -> Result<Self, RouteTableError> {
        let mut seen: HashSet<(String, Method)> = HashSet::new();
        for rule in &rules {
            if !clusters.contains(&rule.cluster_id) {
                return Err(RouteTableError::UnknownCluster {
                    route: rule.id.clone(),
                    cluster: rule.cluster_id.clone(),
                });
            }
            for method in &rule.methods {
                let key = (rule.pattern.as_str().to_string(), method.clone());
                if !seen.insert(key) {
                    return Err(RouteTableError::DuplicateRouteKey {
                        pattern: rule.pattern.as_str().to_string(),
                        method: method.clone(),
                    });
                }
            }
        }

        // Longest static prefix first; registration order breaks ties.
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.pattern.static_prefix_len()));

        Ok(Self { rules })
    }

    /// Find the rule matching the request, if any.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        for rule in &self.rules {
            if !rule.methods.contains(method) {
                continue;
            }
            if let Some(params) = rule.pattern.matches(path) {
                return Some(RouteMatch { rule, params });
            }
        }
        None
    }

    /// All rules, in match order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterRule;

    fn clusters() -> ClusterRegistry {
        ClusterRegistry::new(vec![
            ClusterRule::new("svc-a", "http://localhost:9001"),
            ClusterRule::new("svc-b", "http://localhost:9002"),
        ])
        .unwrap()
    }

    fn rule(
        id: &str,
        pattern: &str,
        methods: &[Method],
        cluster: &str,
    ) -> RouteRule {
        RouteRule::new(id, pattern, methods, cluster, None).unwrap()
    }

    #[test]
    fn matches_registered_route_per_method() {
        let table = RouteTable::new(
            vec![
                rule("list", "/api/things", &[Method::GET], "svc-a"),
                rule("create", "/api/things", &[Method::POST], "svc-a"),
            ],
            &clusters(),
        )
        .unwrap();

        assert_eq!(
            table.match_route(&Method::GET, "/api/things").unwrap().rule.id,
            "list"
        );
        assert_eq!(
            table.match_route(&Method::POST, "/api/things").unwrap().rule.id,
            "create"
        );
        assert!(table.match_route(&Method::DELETE, "/api/things").is_none());
    }

    #[test]
    fn no_match_for_unregistered_path() {
        let table = RouteTable::new(
            vec![rule("list", "/api/things", &[Method::GET], "svc-a")],
            &clusters(),
        )
        .unwrap();
        assert!(table.match_route(&Method::GET, "/api/other").is_none());
    }

    #[test]
    fn duplicate_pattern_method_pair_is_rejected() {
        let err = RouteTable::new(
            vec![
                rule("a", "/api/things", &[Method::GET, Method::POST], "svc-a"),
                rule("b", "/api/things", &[Method::POST], "svc-b"),
            ],
            &clusters(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteTableError::DuplicateRouteKey { .. }));
    }

    #[test]
    fn same_pattern_disjoint_methods_is_allowed() {
        assert!(RouteTable::new(
            vec![
                rule("a", "/api/things", &[Method::GET], "svc-a"),
                rule("b", "/api/things", &[Method::POST], "svc-b"),
            ],
            &clusters(),
        )
        .is_ok());
    }

    #[test]
    fn unknown_cluster_reference_is_rejected() {
        let err = RouteTable::new(
            vec![rule("a", "/api/things", &[Method::GET], "nope")],
            &clusters(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteTableError::UnknownCluster { .. }));
    }

    #[test]
    fn longest_static_prefix_wins_regardless_of_registration_order() {
        // The by-id rule registered first must still lose to the more
        // specific by-category rule.
        let table = RouteTable::new(
            vec![
                rule("by-id", "/api/items/{id}/{extra}", &[Method::GET], "svc-a"),
                rule(
                    "by-category",
                    "/api/items/category/{category}",
                    &[Method::GET],
                    "svc-a",
                ),
            ],
            &clusters(),
        )
        .unwrap();

        let matched = table
            .match_route(&Method::GET, "/api/items/category/snacks")
            .unwrap();
        assert_eq!(matched.rule.id, "by-category");
        assert_eq!(
            matched.params,
            vec![("category".to_string(), "snacks".to_string())]
        );

        let matched = table
            .match_route(&Method::GET, "/api/items/42/details")
            .unwrap();
        assert_eq!(matched.rule.id, "by-id");
    }

    #[test]
    fn catch_all_rule_matches_deep_suffix() {
        let table = RouteTable::new(
            vec![rule(
                "qr",
                "/api/payment/qr-image/{**rest}",
                &[Method::GET],
                "svc-a",
            )],
            &clusters(),
        )
        .unwrap();

        let matched = table
            .match_route(&Method::GET, "/api/payment/qr-image/2024/01/x.png")
            .unwrap();
        assert_eq!(matched.rule.id, "qr");
        assert_eq!(
            matched.params,
            vec![("rest".to_string(), "2024/01/x.png".to_string())]
        );
    }

    #[test]
    fn empty_method_set_is_rejected_at_construction() {
        let err = RouteRule::new("a", "/api/things", &[], "svc-a", None).unwrap_err();
        assert!(matches!(err, RouteTableError::EmptyMethodSet { .. }));
    }
}
