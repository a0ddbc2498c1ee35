//! HS256 token issuing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use justice_core::Document;

use crate::claims::{split_reserved, TokenError, VerifiedToken, RESERVED_CLAIMS};

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::days(1);

/// Signs caller payloads into bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue_at(&self, payload: Value, issued_at: DateTime<Utc>) -> Result<String, TokenError>;

    fn issue(&self, payload: Value) -> Result<String, TokenError> {
        self.issue_at(payload, Utc::now())
    }
}

/// Verifies bearer tokens.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}

/// Shared-secret token service.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL)
    }

    pub fn with_ttl(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // `aud` is ordinary caller payload here.
        validation.validate_aud = false;
        validation
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256TokenService {
    fn issue_at(&self, payload: Value, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let Value::Object(mut claims) = payload else {
            return Err(TokenError::InvalidPayload);
        };
        if let Some(reserved) = RESERVED_CLAIMS.iter().find(|c| claims.contains_key(**c)) {
            return Err(TokenError::ReservedClaim((*reserved).to_string()));
        }

        let expires_at = issued_at + self.ttl;
        claims.insert("iat".into(), issued_at.timestamp().into());
        claims.insert("exp".into(), expires_at.timestamp().into());

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl JwtValidator for Hs256TokenService {
    fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<Document>(token, &self.decoding, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        split_reserved(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_verifies_back_to_payload() {
        let svc = Hs256TokenService::new(SECRET);
        let token = svc.issue(json!({"uid": "u1", "email": "client@example.com"})).unwrap();

        let verified = svc.validate(&token).unwrap();
        assert_eq!(verified.uid(), Some("u1"));
        assert_eq!(verified.payload["email"], "client@example.com");
        assert_eq!(verified.expires_at - verified.issued_at, DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = Hs256TokenService::new(SECRET);
        let token = svc
            .issue_at(json!({"uid": "u1"}), Utc::now() - Duration::days(2))
            .unwrap();

        assert_eq!(svc.validate(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issuer = Hs256TokenService::new("other-secret");
        let token = issuer.issue(json!({"uid": "u1"})).unwrap();

        let svc = Hs256TokenService::new(SECRET);
        assert_eq!(svc.validate(&token).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = Hs256TokenService::new(SECRET);
        assert!(matches!(svc.validate("not.a.jwt"), Err(TokenError::Malformed(_))));
        assert!(matches!(svc.validate(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn non_object_payloads_cannot_be_signed() {
        let svc = Hs256TokenService::new(SECRET);
        assert_eq!(svc.issue(json!("u1")).unwrap_err(), TokenError::InvalidPayload);
        assert_eq!(svc.issue(json!([1, 2])).unwrap_err(), TokenError::InvalidPayload);
    }

    #[test]
    fn reserved_claims_cannot_be_supplied() {
        let svc = Hs256TokenService::new(SECRET);
        let err = svc.issue(json!({"uid": "u1", "exp": 1})).unwrap_err();
        assert_eq!(err, TokenError::ReservedClaim("exp".into()));
        assert!(err.is_bad_payload());

        let err = svc.issue(json!({"uid": "u1", "iat": 0})).unwrap_err();
        assert_eq!(err, TokenError::ReservedClaim("iat".into()));
    }

    #[test]
    fn custom_ttl_is_applied() {
        let svc = Hs256TokenService::with_ttl(SECRET, Duration::minutes(5));
        let verified = svc.validate(&svc.issue(json!({})).unwrap()).unwrap();
        assert_eq!(verified.expires_at - verified.issued_at, Duration::minutes(5));
    }

    fn claim_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-zA-Z0-9 @.]{0,16}".prop_map(Value::from),
        ]
    }

    proptest! {
        #[test]
        fn payload_round_trips(entries in prop::collection::btree_map("k[a-z_]{0,8}", claim_value(), 0..8)) {
            let svc = Hs256TokenService::new(SECRET);
            let payload: Document = entries.into_iter().collect();

            let token = svc.issue(Value::Object(payload.clone())).unwrap();
            let verified = svc.validate(&token).unwrap();

            prop_assert_eq!(verified.payload, payload);
        }
    }
}
