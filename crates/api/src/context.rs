use justice_auth::VerifiedToken;

/// Caller context for a request that passed the auth gate.
///
/// Inserted by the auth middleware; gated handlers take it as an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerContext {
    token: VerifiedToken,
}

impl CallerContext {
    pub fn new(token: VerifiedToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &VerifiedToken {
        &self.token
    }

    pub fn uid(&self) -> Option<&str> {
        self.token.uid()
    }
}
