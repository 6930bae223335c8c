//! Crate-level tests
//!
//! Exercises the three HTTP operations end-to-end against an in-memory
//! user directory, plus the lookup-or-create race behavior the
//! PostgreSQL unique constraint backs in production.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenClaims, TokenKind, TokenService};
use crate::application::{LoginInput, LoginUseCase};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};
use crate::presentation::router::auth_router_generic;

// ============================================================================
// In-memory directory double
// ============================================================================

/// HashMap-backed directory. `create` is atomic and enforces email
/// uniqueness the way the production unique constraint does.
#[derive(Clone, Default)]
struct MemoryDirectory {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryDirectory {
    fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email.as_str()).cloned())
    }

    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();

        if users.contains_key(user.email.as_str()) {
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let record = User {
            user_id: UserId::new(),
            name: user.name.clone(),
            email: user.email.clone(),
            nickname: String::new(),
            interest_univ: String::new(),
            interest_type: None,
            course: String::new(),
            belong_to: String::new(),
            profile_image: None,
            favorites: None,
            is_mentor: false,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.email.as_str().to_string(), record.clone());
        Ok(record)
    }
}

/// Directory whose first `find_by_email` reports absent even when the
/// row exists, reproducing the lost half of a concurrent first login.
#[derive(Clone)]
struct LostRaceDirectory {
    inner: MemoryDirectory,
    first_find: Arc<AtomicBool>,
}

impl LostRaceDirectory {
    fn new(inner: MemoryDirectory) -> Self {
        Self {
            inner,
            first_find: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl UserDirectory for LostRaceDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        if self.first_find.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_email(email).await
    }

    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        self.inner.create(user).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> AuthConfig {
    AuthConfig::development()
}

fn router_with(config: &AuthConfig, directory: MemoryDirectory) -> Router {
    auth_router_generic(directory, config.clone())
}

fn login_body(name: &str, email: &str) -> Body {
    Body::from(
        serde_json::to_vec(&json!({ "userInfo": { "name": name, "email": email } })).unwrap(),
    )
}

fn post_json(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

fn get_protected(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/protected");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn expired_refresh_token(tokens: &TokenService) -> String {
    // Issued eight days ago with the seven-day TTL: past expiry.
    let iat = Utc::now().timestamp() - 8 * 24 * 3600;
    let claims = TokenClaims {
        sub: "user-1".to_string(),
        name: "Alice".to_string(),
        email: "a@x.com".to_string(),
        iat,
        exp: iat + 604_800,
    };
    tokens.sign_claims(&claims, TokenKind::Refresh).unwrap()
}

// ============================================================================
// Login-or-register
// ============================================================================

#[tokio::test]
async fn login_registers_user_and_sets_session_cookies() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let response = router
        .oneshot(post_json("/auth", login_body("Alice", "a@x.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies.len(), 2);

    let access_cookie = cookies.iter().find(|c| c.starts_with("auth=")).unwrap();
    assert!(access_cookie.contains("HttpOnly"));
    assert!(access_cookie.contains("Path=/"));
    assert!(access_cookie.contains("Max-Age=900"));

    let refresh_cookie = cookies
        .iter()
        .find(|c| c.starts_with("refreshAuth="))
        .unwrap();
    assert!(refresh_cookie.contains("HttpOnly"));
    assert!(refresh_cookie.contains("Path=/"));
    assert!(refresh_cookie.contains("Max-Age=604800"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["user"]["nickname"], "");
    assert_eq!(body["user"]["isMentor"], false);

    // Both issued tokens verify under their own class and carry the
    // persisted identity.
    let access = tokens
        .verify(body["accessToken"].as_str().unwrap(), TokenKind::Access)
        .unwrap();
    assert_eq!(access.name, "Alice");
    assert_eq!(access.email, "a@x.com");
    assert_eq!(access.sub, body["user"]["id"].as_str().unwrap());

    let refresh = tokens
        .verify(body["refreshToken"].as_str().unwrap(), TokenKind::Refresh)
        .unwrap();
    assert_eq!(refresh.sub, access.sub);
}

#[tokio::test]
async fn login_with_known_email_reuses_the_user() {
    let config = test_config();
    let directory = MemoryDirectory::default();
    let router = router_with(&config, directory.clone());

    let first = router
        .clone()
        .oneshot(post_json("/auth", login_body("Alice", "a@x.com")))
        .await
        .unwrap();
    let second = router
        .oneshot(post_json("/auth", login_body("Alice Renamed", "a@x.com")))
        .await
        .unwrap();

    let first = body_json(first).await;
    let second = body_json(second).await;

    assert_eq!(first["user"]["id"], second["user"]["id"]);
    // Repeat login must not overwrite the stored profile.
    assert_eq!(second["user"]["name"], "Alice");
    assert_eq!(directory.user_count(), 1);
}

#[tokio::test]
async fn login_rejects_incomplete_payloads() {
    let config = test_config();
    let router = router_with(&config, MemoryDirectory::default());

    let missing_user_info = router
        .clone()
        .oneshot(post_json("/auth", Body::from("{}")))
        .await
        .unwrap();
    assert_eq!(missing_user_info.status(), StatusCode::BAD_REQUEST);

    let empty_email = router
        .oneshot(post_json("/auth", login_body("Alice", "")))
        .await
        .unwrap();
    assert_eq!(empty_email.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn refresh_mints_a_fresh_access_token() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let refresh_token = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Refresh)
        .unwrap();

    let response = router
        .oneshot(post_json(
            "/token",
            Body::from(
                serde_json::to_vec(&json!({ "refreshToken": refresh_token })).unwrap(),
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Rotation is off by default: no cookie is re-set.
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = body_json(response).await;
    assert_eq!(body["subject"], "user-1");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("refreshToken").is_none());

    let claims = tokens
        .verify(body["accessToken"].as_str().unwrap(), TokenKind::Access)
        .unwrap();
    assert_eq!(claims.sub, "user-1");
    assert_eq!(claims.name, "Alice");
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.exp, claims.iat + 900);
}

#[tokio::test]
async fn refresh_without_a_token_is_unauthorized() {
    let config = test_config();
    let router = router_with(&config, MemoryDirectory::default());

    let missing = router
        .clone()
        .oneshot(post_json("/token", Body::from("{}")))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let empty = router
        .oneshot(post_json(
            "/token",
            Body::from(serde_json::to_vec(&json!({ "refreshToken": "" })).unwrap()),
        ))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_an_expired_token_is_forbidden() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let expired = expired_refresh_token(&tokens);

    let response = router
        .oneshot(post_json(
            "/token",
            Body::from(serde_json::to_vec(&json!({ "refreshToken": expired })).unwrap()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refresh_with_a_tampered_token_is_forbidden() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let mut token = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Refresh)
        .unwrap();
    // Clip the signature.
    token.pop();

    let response = router
        .oneshot(post_json(
            "/token",
            Body::from(serde_json::to_vec(&json!({ "refreshToken": token })).unwrap()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refresh_rotation_reissues_the_refresh_cookie() {
    let mut config = test_config();
    config.rotate_refresh_tokens = true;
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let refresh_token = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Refresh)
        .unwrap();

    let response = router
        .oneshot(post_json(
            "/token",
            Body::from(
                serde_json::to_vec(&json!({ "refreshToken": refresh_token })).unwrap(),
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("refreshAuth="));

    let body = body_json(response).await;
    let rotated = body["refreshToken"].as_str().unwrap();
    let claims = tokens.verify(rotated, TokenKind::Refresh).unwrap();
    assert_eq!(claims.sub, "user-1");
}

// ============================================================================
// Verify
// ============================================================================

#[tokio::test]
async fn protected_greets_a_valid_session() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    let access = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Access)
        .unwrap();

    let response = router
        .oneshot(get_protected(Some(&format!("auth={access}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello Alice");
}

#[tokio::test]
async fn protected_rejects_missing_empty_and_invalid_cookies() {
    let config = test_config();
    let tokens = TokenService::from_config(&config);
    let router = router_with(&config, MemoryDirectory::default());

    // A valid request first; the next requests must not inherit it.
    let access = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Access)
        .unwrap();
    let ok = router
        .clone()
        .oneshot(get_protected(Some(&format!("auth={access}"))))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let missing = router.clone().oneshot(get_protected(None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let empty = router
        .clone()
        .oneshot(get_protected(Some("auth=")))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::UNAUTHORIZED);

    let garbage = router
        .clone()
        .oneshot(get_protected(Some("auth=not-a-token")))
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token.
    let refresh = tokens
        .issue("user-1", "Alice", "a@x.com", TokenKind::Refresh)
        .unwrap();
    let wrong_class = router
        .oneshot(get_protected(Some(&format!("auth={refresh}"))))
        .await
        .unwrap();
    assert_eq!(wrong_class.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Lookup-or-create race behavior
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_first_logins_create_exactly_one_user() {
    let config = test_config();
    let directory = MemoryDirectory::default();
    let tokens = Arc::new(TokenService::from_config(&config));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let use_case = LoginUseCase::new(Arc::new(directory.clone()), tokens.clone());
        handles.push(tokio::spawn(async move {
            use_case
                .execute(LoginInput {
                    name: "Alice".to_string(),
                    email: Email::new("a@x.com").unwrap(),
                })
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let output = handle.await.unwrap().expect("login must not surface the race");
        ids.push(output.user.user_id);
    }

    assert_eq!(directory.user_count(), 1);
    assert!(ids.iter().all(|id| *id == ids[0]));
}

#[tokio::test]
async fn login_losing_the_create_race_falls_back_to_the_winner() {
    let config = test_config();
    let tokens = Arc::new(TokenService::from_config(&config));
    let inner = MemoryDirectory::default();

    // The winner's row is already in the store, but this login's first
    // find observed "absent".
    let winner = inner
        .create(&NewUser {
            name: "Alice".to_string(),
            email: Email::new("a@x.com").unwrap(),
        })
        .await
        .unwrap();

    let use_case = LoginUseCase::new(
        Arc::new(LostRaceDirectory::new(inner.clone())),
        tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            name: "Alice".to_string(),
            email: Email::new("a@x.com").unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.user_id, winner.user_id);
    assert_eq!(inner.user_count(), 1);
}
