//! Identity subsystem.
//!
//! # Data Flow
//! ```text
//! Raw bearer token
//!     → validator.rs (signature, issuer, audience, expiry)
//!     → claims.rs (long-form claim keys → canonical short keys)
//!     → identity.rs (NormalizedIdentity value)
//!
//! No token on the request → "no identity" (anonymous), not a failure.
//! ```
//!
//! # Design Decisions
//! - Validation checks run in a fixed order and short-circuit
//! - Claim normalization is a pure rename/merge, never a mutation
//! - Identities are per-request values, never cached or persisted

pub mod claims;
pub mod identity;
pub mod validator;

pub use claims::{normalize_claims, Claim};
pub use identity::NormalizedIdentity;
pub use validator::{TokenValidator, ValidationFailure};
