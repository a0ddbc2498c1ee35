//! Owner-scope check for endpoints that only return the caller's own data.

use thiserror::Error;

use crate::claims::VerifiedToken;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnerScopeError {
    #[error("token carries no owner identifier")]
    MissingOwnerClaim,

    #[error("request names no owner")]
    MissingRequestedOwner,

    #[error("token owner does not match requested owner")]
    Mismatch,
}

/// Require that the requested owner is the token's owner.
///
/// Both sides must be present; an absent `uid` never matches another absent
/// `uid`, so an anonymous token cannot list everyone's data.
pub fn ensure_owner(token: &VerifiedToken, requested: Option<&str>) -> Result<(), OwnerScopeError> {
    let owner = token.uid().ok_or(OwnerScopeError::MissingOwnerClaim)?;
    let requested = requested.ok_or(OwnerScopeError::MissingRequestedOwner)?;
    if owner == requested {
        Ok(())
    } else {
        tracing::debug!(owner, requested, "owner scope mismatch");
        Err(OwnerScopeError::Mismatch)
    }
}
