//! Authorization policies.
//!
//! # Responsibilities
//! - Define the fixed catalogue of named policies
//! - Evaluate a policy against an optional caller identity
//!
//! # Design Decisions
//! - Closed enumeration instead of a string-keyed registry: a route
//!   referencing an unknown policy name is rejected when the route table is
//!   built, never at request time
//! - Every named policy requires at least authentication; none allows
//!   anonymous callers
//! - Role comparison is exact (case-sensitive)

use crate::auth::NormalizedIdentity;

/// Role vocabulary carried by token `role` claims.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const CUSTOMER: &str = "customer";
    pub const KITCHEN: &str = "kitchen";
    pub const OPERATOR: &str = "operator";
    pub const MANAGER: &str = "manager";
}

/// The fixed catalogue of authorization policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    AdminOnly,
    AdminOrManager,
    KitchenStaff,
    Operators,
    Management,
    AuthenticatedUser,
    OrderManagement,
    DataQuery,
}

/// Roles sufficient to pass a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedRoles {
    /// Any authenticated caller passes, regardless of roles.
    Any,
    /// Callers carrying at least one of these roles pass.
    OneOf(&'static [&'static str]),
}

/// Outcome of evaluating a policy against a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

/// Why a policy denied the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity present where the policy requires one.
    Unauthenticated,
    /// Identity present but none of its roles is permitted.
    RoleNotPermitted,
}

impl Policy {
    pub const ALL: [Policy; 8] = [
        Policy::AdminOnly,
        Policy::AdminOrManager,
        Policy::KitchenStaff,
        Policy::Operators,
        Policy::Management,
        Policy::AuthenticatedUser,
        Policy::OrderManagement,
        Policy::DataQuery,
    ];

    /// Policy name as it appears in route configuration and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::AdminOnly => "AdminOnly",
            Policy::AdminOrManager => "AdminOrManager",
            Policy::KitchenStaff => "KitchenStaff",
            Policy::Operators => "Operators",
            Policy::Management => "Management",
            Policy::AuthenticatedUser => "AuthenticatedUser",
            Policy::OrderManagement => "OrderManagement",
            Policy::DataQuery => "DataQuery",
        }
    }

    /// Look up a policy by name. `None` means a configuration defect.
    pub fn from_name(name: &str) -> Option<Policy> {
        Policy::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// The role set sufficient to pass this policy.
    pub fn allowed_roles(&self) -> AllowedRoles {
        use roles::*;
        match self {
            Policy::AdminOnly => AllowedRoles::OneOf(&[ADMIN]),
            Policy::AdminOrManager => AllowedRoles::OneOf(&[ADMIN, MANAGER]),
            Policy::KitchenStaff => AllowedRoles::OneOf(&[KITCHEN, ADMIN, MANAGER]),
            Policy::Operators => AllowedRoles::OneOf(&[OPERATOR, ADMIN, MANAGER]),
            Policy::Management => AllowedRoles::OneOf(&[ADMIN, MANAGER]),
            Policy::AuthenticatedUser => AllowedRoles::Any,
            Policy::OrderManagement => AllowedRoles::OneOf(&[ADMIN, KITCHEN]),
            Policy::DataQuery => AllowedRoles::OneOf(&[ADMIN, MANAGER, OPERATOR]),
        }
    }

    /// Evaluate this policy against an optional caller identity.
    pub fn evaluate(&self, identity: Option<&NormalizedIdentity>) -> AccessDecision {
        let Some(identity) = identity else {
            return AccessDecision::Deny(DenyReason::Unauthenticated);
        };

        match self.allowed_roles() {
            AllowedRoles::Any => AccessDecision::Allow,
            AllowedRoles::OneOf(allowed) => {
                if allowed.iter().any(|role| identity.has_role(role)) {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny(DenyReason::RoleNotPermitted)
                }
            }
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
