//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Login-or-register from an upstream identity assertion (name + email)
//! - Paired access (15 min) / refresh (7 day) JWTs, independent secrets
//! - Cookie-bound sessions (`auth` / `refreshAuth`, HttpOnly, Path=/)
//! - Access-token renewal from a presented refresh token
//!
//! ## Security Model
//! - HS256 signatures via `jsonwebtoken`; verification failures collapse
//!   to a single externally visible rejection
//! - Missing signing secrets abort startup, never a per-request error
//! - User creation races resolve through the store's unique email
//!   constraint plus a create-then-find fallback

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserDirectory;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgUserDirectory as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
