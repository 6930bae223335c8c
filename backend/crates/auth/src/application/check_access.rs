//! Check Access Use Case
//!
//! Validates a presented access token for protected requests.

use std::sync::Arc;

use crate::application::token::{TokenClaims, TokenKind, TokenService};
use crate::error::{AuthError, AuthResult};

/// Check access use case
pub struct CheckAccessUseCase {
    tokens: Arc<TokenService>,
}

impl CheckAccessUseCase {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Verify an access token and return its claims.
    ///
    /// Every failure mode maps to [`AuthError::Unauthorized`] so a
    /// missing cookie and an invalid one are indistinguishable to the
    /// caller.
    pub fn execute(&self, access_token: &str) -> AuthResult<TokenClaims> {
        self.tokens
            .verify(access_token, TokenKind::Access)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AuthError::Unauthorized
            })
    }
}
