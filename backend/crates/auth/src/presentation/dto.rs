//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Login
// ============================================================================

/// Login request: the identity assertion relayed by the frontend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Absence is a declared 400, not a deserialization failure
    #[serde(default)]
    pub user_info: Option<UserInfoPayload>,
}

/// The upstream provider's claim about the user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

// ============================================================================
// Refresh
// ============================================================================

/// Refresh request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Refresh response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    /// Present only when refresh rotation is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub subject: String,
    pub name: String,
    pub email: String,
}

// ============================================================================
// User
// ============================================================================

/// User profile as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub nickname: String,
    pub interest_univ: String,
    pub interest_type: Option<String>,
    pub course: String,
    pub belong_to: String,
    pub profile_image: Option<String>,
    pub favorites: Option<Vec<String>>,
    pub is_mentor: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.to_string(),
            name: user.name,
            email: user.email.to_string(),
            nickname: user.nickname,
            interest_univ: user.interest_univ,
            interest_type: user.interest_type,
            course: user.course,
            belong_to: user.belong_to,
            profile_image: user.profile_image,
            favorites: user.favorites,
            is_mentor: user.is_mentor,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
