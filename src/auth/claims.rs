//! Claim normalization.
//!
//! # Responsibilities
//! - Rewrite long-form identity-provider claim keys into canonical short keys
//! - Pass every other claim through unchanged
//!
//! # Design Decisions
//! - Pure transformation: raw claims in, new claims out, no mutation of a
//!   caller-visible identity object
//! - Rename/merge only; performs no validation and never fails
//! - An absent mapped claim simply means the canonical key is absent
//!   downstream

/// Canonical short key for role claims.
pub const CANONICAL_ROLE: &str = "role";
/// Canonical short key for email claims.
pub const CANONICAL_EMAIL: &str = "email";
/// Canonical short key for subject claims.
pub const CANONICAL_SUB: &str = "sub";

/// Long-form WS-* claim URI for roles.
pub const ROLE_CLAIM_URI: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
/// Long-form WS-* claim URI for email addresses.
pub const EMAIL_CLAIM_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
/// Long-form WS-* claim URI for the name identifier (subject).
pub const NAME_IDENTIFIER_CLAIM_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// A single raw or canonical claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub key: String,
    pub value: String,
}

impl Claim {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Canonical target key for a source claim key, if it is one of the three
/// mapped claims.
fn canonical_key(source: &str) -> Option<&'static str> {
    match source {
        ROLE_CLAIM_URI | CANONICAL_ROLE => Some(CANONICAL_ROLE),
        EMAIL_CLAIM_URI | CANONICAL_EMAIL => Some(CANONICAL_EMAIL),
        NAME_IDENTIFIER_CLAIM_URI | CANONICAL_SUB => Some(CANONICAL_SUB),
        _ => None,
    }
}

/// Normalize a set of raw claims into canonical claims.
///
/// Each claim is mapped independently through a fixed key-rename table.
/// When several distinct source keys feed the same canonical key, all of
/// them are removed and one canonical claim is emitted per distinct value.
/// Claims outside the table pass through unchanged, in order.
pub fn normalize_claims(raw: Vec<Claim>) -> Vec<Claim> {
    let mut out = Vec::with_capacity(raw.len());

    for claim in raw {
        match canonical_key(&claim.key) {
            Some(canonical) => {
                let mapped = Claim::new(canonical, claim.value);
                // Distinct values only: two sources carrying the same value
                // collapse into one canonical claim.
                if !out.contains(&mapped) {
                    out.push(mapped);
                }
            }
            None => out.push(claim),
        }
    }

    out
}
