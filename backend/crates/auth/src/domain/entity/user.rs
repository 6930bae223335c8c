//! User Entity
//!
//! The durable identity record. Created once, on the first successful
//! login with a previously unseen email; this module never mutates or
//! deletes it afterwards (profile management lives elsewhere).

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User entity
///
/// `user_id`, `created_at` and `updated_at` are store-managed. Every
/// profile field starts at its default (empty string / None / false);
/// only `name` and `email` come from the signup assertion.
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned UUID, immutable
    pub user_id: UserId,
    /// Display name captured at signup time
    pub name: String,
    /// Unique lookup key
    pub email: Email,
    /// Profile: nickname, defaults to ""
    pub nickname: String,
    /// Profile: university of interest, defaults to ""
    pub interest_univ: String,
    /// Profile: admission type of interest
    pub interest_type: Option<String>,
    /// Profile: course, defaults to ""
    pub course: String,
    /// Profile: school / organization, defaults to ""
    pub belong_to: String,
    /// Profile: avatar URL
    pub profile_image: Option<String>,
    /// Profile: ordered favorites list
    pub favorites: Option<Vec<String>>,
    /// Whether this user acts as a mentor
    pub is_mentor: bool,
    /// Created timestamp (store-managed)
    pub created_at: DateTime<Utc>,
    /// Updated timestamp (store-managed)
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The `sub` claim value for tokens bound to this user
    pub fn token_subject(&self) -> String {
        self.user_id.to_string()
    }
}

/// Signup input for a not-yet-persisted user.
///
/// Everything not listed here is initialized by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
}
