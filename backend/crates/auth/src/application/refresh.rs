//! Refresh Use Case
//!
//! Mints a fresh access token from a presented refresh token.

use std::sync::Arc;

use crate::application::token::{TokenClaims, TokenKind, TokenService};
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    /// Newly minted access token
    pub access_token: String,
    /// Replacement refresh token, only when rotation is enabled
    pub refresh_token: Option<String>,
    /// Claims carried over from the verified refresh token
    pub claims: TokenClaims,
}

/// Refresh use case
pub struct RefreshUseCase {
    tokens: Arc<TokenService>,
    rotate_refresh: bool,
}

impl RefreshUseCase {
    pub fn new(tokens: Arc<TokenService>, rotate_refresh: bool) -> Self {
        Self {
            tokens,
            rotate_refresh,
        }
    }

    /// Verify the refresh token and issue a fresh access token.
    ///
    /// Expired, malformed and tampered tokens all collapse to
    /// [`AuthError::RefreshTokenInvalid`]; the caller learns nothing
    /// about which check failed.
    pub fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                AuthError::RefreshTokenInvalid
            })?;

        let access_token =
            self.tokens
                .issue(&claims.sub, &claims.name, &claims.email, TokenKind::Access)?;

        let refresh_token = if self.rotate_refresh {
            Some(self.tokens.issue(
                &claims.sub,
                &claims.name,
                &claims.email,
                TokenKind::Refresh,
            )?)
        } else {
            None
        };

        tracing::debug!(sub = %claims.sub, rotated = self.rotate_refresh, "Access token renewed");

        Ok(RefreshOutput {
            access_token,
            refresh_token,
            claims,
        })
    }
}
