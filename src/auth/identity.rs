//! Normalized caller identity.
//!
//! # Responsibilities
//! - Hold the canonical-claim view of a validated bearer token
//! - Scope: one request; constructed once, never mutated, never cached
//!
//! # Design Decisions
//! - Built only from canonical claims (post-normalization)
//! - Roles are a set: a token may carry zero, one, or many role claims
//! - No reference back to the raw token or raw claims

use std::collections::BTreeSet;

use crate::auth::claims::{Claim, CANONICAL_EMAIL, CANONICAL_ROLE, CANONICAL_SUB};

/// The canonical-claim view of a validated bearer token.
///
/// Exclusively owned by the request that produced it and discarded after
/// the dispatch decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentity {
    /// Canonical unique identifier of the caller (`sub`), if the token
    /// carried one.
    pub subject: Option<String>,

    /// Caller email (`email`), if the token carried one.
    pub email: Option<String>,

    /// Role claims, collapsed into a set.
    pub roles: BTreeSet<String>,
}

impl NormalizedIdentity {
    /// Build an identity from canonical claims.
    ///
    /// Expects claims that already went through the normalizer; long-form
    /// source keys are ignored here rather than re-mapped.
    pub fn from_claims(claims: &[Claim]) -> Self {
        let mut subject = None;
        let mut email = None;
        let mut roles = BTreeSet::new();

        for claim in claims {
            match claim.key.as_str() {
                CANONICAL_SUB => {
                    if subject.is_none() {
                        subject = Some(claim.value.clone());
                    }
                }
                CANONICAL_EMAIL => {
                    if email.is_none() {
                        email = Some(claim.value.clone());
                    }
                }
                CANONICAL_ROLE => {
                    roles.insert(claim.value.clone());
                }
                _ => {}
            }
        }

        Self {
            subject,
            email,
            roles,
        }
    }

    /// True if the caller carries the given role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
