//! HTTP Handlers
//!
//! The three externally visible operations, each a stateless
//! composition of the directory, the token service and the session
//! cookies. Nothing is retained across calls.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{CheckAccessUseCase, LoginInput, LoginUseCase, RefreshUseCase};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};
use crate::presentation::cookies::SessionCookies;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<D>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    pub directory: Arc<D>,
    pub tokens: Arc<TokenService>,
    pub cookies: SessionCookies,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login-or-register
// ============================================================================

/// POST /auth
pub async fn login<D>(
    State(state): State<AuthAppState<D>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let user_info = req
        .user_info
        .ok_or(AuthError::InvalidLoginPayload("userInfo is required"))?;

    let email = Email::new(user_info.email.as_str())
        .map_err(|_| AuthError::InvalidLoginPayload("userInfo.email is missing or invalid"))?;

    let use_case = LoginUseCase::new(state.directory.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            name: user_info.name,
            email,
        })
        .await?;

    let cookies = state
        .cookies
        .issue(&output.access_token, &output.refresh_token);

    Ok((
        StatusCode::OK,
        cookies,
        Json(LoginResponse {
            access_token: output.access_token,
            refresh_token: output.refresh_token,
            user: UserResponse::from(output.user),
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /token
pub async fn refresh<D>(
    State(state): State<AuthAppState<D>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Response>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let token = req
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::RefreshTokenMissing)?;

    let use_case = RefreshUseCase::new(state.tokens.clone(), state.config.rotate_refresh_tokens);
    let output = use_case.execute(&token)?;

    let rotated_cookie = output
        .refresh_token
        .as_deref()
        .map(|t| state.cookies.issue_refresh(t));

    let body = Json(RefreshResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        subject: output.claims.sub,
        name: output.claims.name,
        email: output.claims.email,
    });

    Ok(match rotated_cookie {
        Some(headers) => (StatusCode::OK, headers, body).into_response(),
        None => (StatusCode::OK, body).into_response(),
    })
}

// ============================================================================
// Verify
// ============================================================================

/// GET /protected
pub async fn protected<D>(
    State(state): State<AuthAppState<D>>,
    headers: HeaderMap,
) -> AuthResult<String>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    // Absent and invalid cookies take the same 401 path; no identity is
    // ever carried over from an earlier request.
    let token = state
        .cookies
        .read_access(&headers)
        .ok_or(AuthError::Unauthorized)?;

    let use_case = CheckAccessUseCase::new(state.tokens.clone());
    let claims = use_case.execute(&token)?;

    Ok(format!("Hello {}", claims.name))
}
