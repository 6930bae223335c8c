//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::UserDirectory;
use crate::infra::postgres::PgUserDirectory;
use crate::presentation::cookies::SessionCookies;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with the PostgreSQL directory
pub fn auth_router(directory: PgUserDirectory, config: AuthConfig) -> Router {
    auth_router_generic(directory, config)
}

/// Create an Auth router for any directory implementation
pub fn auth_router_generic<D>(directory: D, config: AuthConfig) -> Router
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(TokenService::from_config(&config));
    let cookies = SessionCookies::from_config(&config);

    let state = AuthAppState {
        directory: Arc::new(directory),
        tokens,
        cookies,
        config: Arc::new(config),
    };

    Router::new()
        .route("/auth", post(handlers::login::<D>))
        .route("/token", post(handlers::refresh::<D>))
        .route("/protected", get(handlers::protected::<D>))
        .with_state(state)
}
