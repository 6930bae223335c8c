//! Session Cookies
//!
//! Binds the issued token pair to HTTP cookies and extracts a presented
//! token from a request's cookie jar. Reading never falls back to a
//! previously seen value: absent, empty and unreadable cookies all
//! report "no session".

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::AppendHeaders;
use platform::cookie::{self, CookieConfig};

use crate::application::config::AuthConfig;

/// The `auth` / `refreshAuth` cookie pair for one deployment
#[derive(Debug, Clone)]
pub struct SessionCookies {
    access: CookieConfig,
    refresh: CookieConfig,
}

impl SessionCookies {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            access: CookieConfig {
                name: config.access_cookie_name.clone(),
                secure: config.cookie_secure,
                http_only: true,
                same_site: config.cookie_same_site,
                path: "/".to_string(),
                max_age_secs: Some(config.access_token_ttl_secs()),
            },
            refresh: CookieConfig {
                name: config.refresh_cookie_name.clone(),
                secure: config.cookie_secure,
                http_only: true,
                same_site: config.cookie_same_site,
                path: "/".to_string(),
                max_age_secs: Some(config.refresh_token_ttl_secs()),
            },
        }
    }

    /// Set-Cookie headers binding both tokens to the response.
    ///
    /// `AppendHeaders` because a plain header map insert would collapse
    /// the two Set-Cookie entries into one.
    pub fn issue(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> AppendHeaders<[(HeaderName, HeaderValue); 2]> {
        AppendHeaders([
            (
                header::SET_COOKIE,
                cookie::set_cookie_header(&self.access, access_token),
            ),
            (
                header::SET_COOKIE,
                cookie::set_cookie_header(&self.refresh, refresh_token),
            ),
        ])
    }

    /// Set-Cookie header for a rotated refresh token
    pub fn issue_refresh(
        &self,
        refresh_token: &str,
    ) -> AppendHeaders<[(HeaderName, HeaderValue); 1]> {
        AppendHeaders([(
            header::SET_COOKIE,
            cookie::set_cookie_header(&self.refresh, refresh_token),
        )])
    }

    /// Read the presented access token, or None when there is no usable
    /// cookie
    pub fn read_access(&self, headers: &HeaderMap) -> Option<String> {
        cookie::extract_cookie(headers, &self.access.name)
    }
}
