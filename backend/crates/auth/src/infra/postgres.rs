//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user directory
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                name,
                email,
                nickname,
                interest_univ,
                interest_type,
                course,
                belong_to,
                profile_image,
                favorites,
                is_mentor,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        // The store assigns user_id and fills every profile default; the
        // RETURNING row is the authoritative record.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING
                user_id,
                name,
                email,
                nickname,
                interest_univ,
                interest_type,
                course,
                belong_to,
                profile_image,
                favorites,
                is_mentor,
                created_at,
                updated_at
            "#,
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // Another login created this email first; the caller
                // falls back to find_by_email.
                AuthError::EmailTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        Ok(row.into_user())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    email: String,
    nickname: String,
    interest_univ: String,
    interest_type: Option<String>,
    course: String,
    belong_to: String,
    profile_image: Option<String>,
    favorites: Option<Vec<String>>,
    is_mentor: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            name: self.name,
            email: Email::from_db(self.email),
            nickname: self.nickname,
            interest_univ: self.interest_univ,
            interest_type: self.interest_type,
            course: self.course,
            belong_to: self.belong_to,
            profile_image: self.profile_image,
            favorites: self.favorites,
            is_mentor: self.is_mentor,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
