//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User directory: the persistence contract for identity records.
///
/// The backing store must enforce email uniqueness; `create` reports a
/// duplicate as [`AuthError::EmailTaken`](crate::error::AuthError) so
/// callers can fall back to `find_by_email` instead of failing a
/// concurrent first login.
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Find a user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Persist a new user; the store assigns the id and fills profile
    /// defaults
    async fn create(&self, user: &NewUser) -> AuthResult<User>;
}
