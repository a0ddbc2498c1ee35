//! `justice-auth` — bearer-token boundary.
//!
//! Issuing and verifying signed tokens, plus the owner-scope check. This crate
//! is decoupled from HTTP and storage.

pub mod claims;
pub mod owner;
pub mod token;

pub use claims::{TokenError, VerifiedToken, RESERVED_CLAIMS};
pub use owner::{ensure_owner, OwnerScopeError};
pub use token::{Hs256TokenService, JwtValidator, TokenIssuer, DEFAULT_TOKEN_TTL};
