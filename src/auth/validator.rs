//! Bearer token validation.
//!
//! # Responsibilities
//! - Verify token signature against the configured symmetric key
//! - Check issuer, audience, and expiry, in that order, first failure wins
//! - Normalize raw claims and build a `NormalizedIdentity`
//!
//! # Design Decisions
//! - Signature is verified by `jsonwebtoken::decode`; issuer, audience, and
//!   lifetime are checked explicitly afterwards so the check order and the
//!   failure kinds stay exact
//! - Zero clock-skew tolerance: an expiry at or before the current instant
//!   fails
//! - A missing bearer token is the host's concern ("no identity"), never a
//!   `ValidationFailure`

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use crate::auth::claims::{normalize_claims, Claim};
use crate::auth::identity::NormalizedIdentity;
use crate::config::JwtConfig;

/// Why a presented bearer token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// Signature does not verify (or the token is not decodable at all).
    #[error("token signature verification failed")]
    BadSignature,

    /// `iss` claim missing or not equal to the configured issuer.
    #[error("token issuer is not trusted")]
    BadIssuer,

    /// `aud` claim missing or not containing the configured audience.
    #[error("token audience does not match")]
    BadAudience,

    /// `exp` claim missing, or at or before the current instant.
    #[error("token is expired")]
    Expired,
}

/// Validates bearer tokens against the configured key, issuer, and audience.
///
/// Stateless over its inputs; safe to share across concurrent requests.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    signature_only: Validation,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // DecodingKey has no Debug impl (and the key is secret anyway).
        f.debug_struct("TokenValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenValidator {
    pub fn new(jwt: &JwtConfig) -> Self {
        // decode() verifies the signature; every claim check is done by
        // this validator so failures map to the exact kind.
        let mut signature_only = Validation::new(Algorithm::HS256);
        signature_only.validate_exp = false;
        signature_only.validate_aud = false;
        signature_only.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(jwt.secret.as_bytes()),
            signature_only,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        }
    }

    /// Validate a raw bearer token and produce the caller's identity.
    pub fn validate(&self, raw_token: &str) -> Result<NormalizedIdentity, ValidationFailure> {
        let data = decode::<serde_json::Map<String, Value>>(
            raw_token,
            &self.decoding_key,
            &self.signature_only,
        )
        .map_err(|_| ValidationFailure::BadSignature)?;
        let claims = data.claims;

        match claims.get("iss").and_then(Value::as_str) {
            Some(iss) if iss == self.issuer => {}
            _ => return Err(ValidationFailure::BadIssuer),
        }

        if !audience_contains(claims.get("aud"), &self.audience) {
            return Err(ValidationFailure::BadAudience);
        }

        // Zero skew: exp exactly at the current instant already fails.
        let now = Utc::now().timestamp();
        match claims.get("exp").and_then(Value::as_i64) {
            Some(exp) if exp > now => {}
            _ => return Err(ValidationFailure::Expired),
        }

        let normalized = normalize_claims(flatten_claims(&claims));
        Ok(NormalizedIdentity::from_claims(&normalized))
    }
}

/// True if the `aud` claim (string or array of strings) contains `expected`.
fn audience_contains(aud: Option<&Value>, expected: &str) -> bool {
    match aud {
        Some(Value::String(s)) => s == expected,
        Some(Value::Array(entries)) => entries
            .iter()
            .any(|v| v.as_str().map(|s| s == expected).unwrap_or(false)),
        _ => false,
    }
}

/// Flatten the decoded claim map into (key, value) pairs.
///
/// A JSON array claim (e.g. multiple roles) yields one pair per element.
fn flatten_claims(claims: &serde_json::Map<String, Value>) -> Vec<Claim> {
    let mut out = Vec::with_capacity(claims.len());
    for (key, value) in claims {
        match value {
            Value::Array(entries) => {
                for entry in entries {
                    out.push(Claim::new(key.clone(), scalar_to_string(entry)));
                }
            }
            other => out.push(Claim::new(key.clone(), scalar_to_string(other))),
        }
    }
    out
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{EMAIL_CLAIM_URI, ROLE_CLAIM_URI};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-key-0123456789";
    const ISSUER: &str = "ManaFoodIssuer";
    const AUDIENCE: &str = "ManaFoodAudience";

    fn validator() -> TokenValidator {
        TokenValidator::new(&JwtConfig {
            secret: SECRET.into(),
            issuer: ISSUER.into(),
            audience: AUDIENCE.into(),
        })
    }

    fn mint_with(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn base_claims() -> serde_json::Map<String, Value> {
        json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": Utc::now().timestamp() + 3600,
            "sub": "user-1",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn valid_token_yields_identity() {
        let mut claims = base_claims();
        claims.insert("role".into(), json!("admin"));
        claims.insert("email".into(), json!("a@b.com"));
        let token = mint_with(SECRET, Value::Object(claims));

        let identity = validator().validate(&token).unwrap();
        assert_eq!(identity.subject.as_deref(), Some("user-1"));
        assert_eq!(identity.email.as_deref(), Some("a@b.com"));
        assert!(identity.has_role("admin"));
    }

    #[test]
    fn wrong_key_is_bad_signature() {
        let token = mint_with("another-secret", Value::Object(base_claims()));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::BadSignature)
        );
    }

    #[test]
    fn garbage_token_is_bad_signature() {
        assert_eq!(
            validator().validate("not.a.jwt"),
            Err(ValidationFailure::BadSignature)
        );
    }

    #[test]
    fn wrong_issuer_is_bad_issuer() {
        let mut claims = base_claims();
        claims.insert("iss".into(), json!("SomeoneElse"));
        let token = mint_with(SECRET, Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::BadIssuer)
        );
    }

    #[test]
    fn missing_audience_is_bad_audience() {
        let mut claims = base_claims();
        claims.remove("aud");
        let token = mint_with(SECRET, Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::BadAudience)
        );
    }

    #[test]
    fn audience_list_containing_expected_passes() {
        let mut claims = base_claims();
        claims.insert("aud".into(), json!(["other", AUDIENCE]));
        let token = mint_with(SECRET, Value::Object(claims));
        assert!(validator().validate(&token).is_ok());
    }

    #[test]
    fn expiry_at_current_instant_fails_with_zero_skew() {
        let mut claims = base_claims();
        claims.insert("exp".into(), json!(Utc::now().timestamp()));
        let token = mint_with(SECRET, Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::Expired)
        );
    }

    #[test]
    fn expired_token_fails() {
        let mut claims = base_claims();
        claims.insert("exp".into(), json!(Utc::now().timestamp() - 60));
        let token = mint_with(SECRET, Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::Expired)
        );
    }

    #[test]
    fn check_order_signature_before_issuer() {
        // Bad signature and bad issuer together: signature wins.
        let mut claims = base_claims();
        claims.insert("iss".into(), json!("SomeoneElse"));
        let token = mint_with("another-secret", Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::BadSignature)
        );
    }

    #[test]
    fn check_order_issuer_before_audience_and_expiry() {
        let mut claims = base_claims();
        claims.insert("iss".into(), json!("SomeoneElse"));
        claims.remove("aud");
        claims.insert("exp".into(), json!(0));
        let token = mint_with(SECRET, Value::Object(claims));
        assert_eq!(
            validator().validate(&token),
            Err(ValidationFailure::BadIssuer)
        );
    }

    #[test]
    fn long_form_claims_are_normalized_into_identity() {
        let mut claims = base_claims();
        claims.remove("sub");
        claims.insert(ROLE_CLAIM_URI.into(), json!("manager"));
        claims.insert(EMAIL_CLAIM_URI.into(), json!("m@b.com"));
        let token = mint_with(SECRET, Value::Object(claims));

        let identity = validator().validate(&token).unwrap();
        assert!(identity.has_role("manager"));
        assert_eq!(identity.email.as_deref(), Some("m@b.com"));
        assert_eq!(identity.subject, None);
    }

    #[test]
    fn role_array_collapses_into_role_set() {
        let mut claims = base_claims();
        claims.insert("role".into(), json!(["admin", "kitchen"]));
        let token = mint_with(SECRET, Value::Object(claims));

        let identity = validator().validate(&token).unwrap();
        assert!(identity.has_role("admin"));
        assert!(identity.has_role("kitchen"));
        assert_eq!(identity.roles.len(), 2);
    }
}
