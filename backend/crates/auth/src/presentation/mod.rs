//! Presentation Layer
//!
//! HTTP handlers, DTOs, session cookies, and the router.

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod router;

pub use cookies::SessionCookies;
pub use handlers::AuthAppState;
pub use router::{auth_router, auth_router_generic};
