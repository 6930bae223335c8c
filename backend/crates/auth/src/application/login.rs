//! Login Use Case
//!
//! Reconciles an upstream identity assertion against the user directory
//! and issues the session token pair.

use std::sync::Arc;

use crate::application::token::{TokenKind, TokenService};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input: the already-authenticated claim from the provider
pub struct LoginInput {
    pub name: String,
    pub email: Email,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    tokens: Arc<TokenService>,
}

impl<D> LoginUseCase<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>, tokens: Arc<TokenService>) -> Self {
        Self { directory, tokens }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Resolve the identity first: if the store fails, the request
        // fails before any token exists.
        let user = self.lookup_or_create(&input).await?;

        // Tokens carry the persisted identity, not the raw payload.
        let sub = user.token_subject();
        let access_token =
            self.tokens
                .issue(&sub, &user.name, user.email.as_str(), TokenKind::Access)?;
        let refresh_token =
            self.tokens
                .issue(&sub, &user.name, user.email.as_str(), TokenKind::Refresh)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Find by email; create with defaults when absent.
    ///
    /// Repeat logins never overwrite an existing record. When two first
    /// logins race, the loser of the unique-constraint race falls back
    /// to the winner's row instead of surfacing the conflict.
    async fn lookup_or_create(&self, input: &LoginInput) -> AuthResult<User> {
        if let Some(user) = self.directory.find_by_email(&input.email).await? {
            return Ok(user);
        }

        let new_user = NewUser {
            name: input.name.clone(),
            email: input.email.clone(),
        };

        match self.directory.create(&new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.user_id, "User registered");
                Ok(user)
            }
            Err(AuthError::EmailTaken) => self
                .directory
                .find_by_email(&input.email)
                .await?
                .ok_or_else(|| {
                    AuthError::Internal("User not found after duplicate-email insert".to_string())
                }),
            Err(e) => Err(e),
        }
    }
}
