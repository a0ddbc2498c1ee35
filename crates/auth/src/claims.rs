use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use justice_core::Document;

/// Claims the issuer stamps onto every token. Callers may not supply them.
///
/// Stricter than most JWT signers, which let a caller pin `iat`: here both
/// timing claims always come from the issuer's clock.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// A token that passed signature and expiry checks.
///
/// `payload` is exactly what the caller handed to the issuer; the reserved
/// timing claims are lifted out into `issued_at` / `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedToken {
    pub payload: Document,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerifiedToken {
    /// Owner identifier carried by the token, if it is a string.
    pub fn uid(&self) -> Option<&str> {
        self.payload.get("uid").and_then(Value::as_str)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token payload must be a JSON object")]
    InvalidPayload,

    #[error("token payload may not set reserved claim '{0}'")]
    ReservedClaim(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl TokenError {
    /// Whether the failure is the caller's fault at issue time.
    pub fn is_bad_payload(&self) -> bool {
        matches!(self, TokenError::InvalidPayload | TokenError::ReservedClaim(_))
    }
}

/// Split decoded claims into the caller payload and the timing claims.
pub(crate) fn split_reserved(mut claims: Document) -> Result<VerifiedToken, TokenError> {
    let issued_at = take_timestamp(&mut claims, "iat")?;
    let expires_at = take_timestamp(&mut claims, "exp")?;
    Ok(VerifiedToken {
        payload: claims,
        issued_at,
        expires_at,
    })
}

fn take_timestamp(claims: &mut Document, name: &str) -> Result<DateTime<Utc>, TokenError> {
    claims
        .remove(name)
        .and_then(|v| v.as_i64())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| TokenError::Malformed(format!("missing or invalid '{name}' claim")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn splits_timing_claims_from_payload() {
        let verified = split_reserved(doc(json!({
            "uid": "u1",
            "email": "a@b.c",
            "iat": 1_700_000_000,
            "exp": 1_700_086_400,
        })))
        .unwrap();

        assert_eq!(verified.payload, doc(json!({"uid": "u1", "email": "a@b.c"})));
        assert_eq!(verified.issued_at.timestamp(), 1_700_000_000);
        assert_eq!(verified.expires_at.timestamp(), 1_700_086_400);
        assert_eq!(verified.uid(), Some("u1"));
    }

    #[test]
    fn missing_exp_is_malformed() {
        let err = split_reserved(doc(json!({"iat": 1}))).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }

    #[test]
    fn non_string_uid_is_not_an_owner() {
        let verified = split_reserved(doc(json!({"uid": 7, "iat": 1, "exp": 2}))).unwrap();
        assert_eq!(verified.uid(), None);
    }
}
