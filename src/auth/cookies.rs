// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential cookies.
//!
//! Names and attributes are a compatibility contract with existing clients:
//!
//! | Cookie | Attributes | Max-Age |
//! |--------|------------|---------|
//! | `access_token` | `Path=/; HttpOnly; Secure; SameSite=Strict` | access lifetime (s) |
//! | `refresh_token` | `Path=/; HttpOnly; Secure; SameSite=Strict` | refresh lifetime (s) |
//!
//! Each cookie is rendered once by the `cookie` crate and appended as a
//! single `Set-Cookie` header.

use axum::http::{
    header::{InvalidHeaderValue, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::credentials::Credential;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Writes and clears the two credential cookies on outbound headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieManager;

impl CookieManager {
    pub fn new() -> Self {
        Self
    }

    /// Append both credential cookies. Callers only invoke this once both
    /// credentials have been issued.
    ///
    /// Both cookies are rendered before either is written, so `headers` is
    /// untouched on error.
    pub fn issue(
        &self,
        headers: &mut HeaderMap,
        access: &Credential,
        refresh: &Credential,
    ) -> Result<(), InvalidHeaderValue> {
        append_pair(
            headers,
            credential_cookie(ACCESS_TOKEN_COOKIE, &access.token, access.max_age_secs()),
            credential_cookie(REFRESH_TOKEN_COOKIE, &refresh.token, refresh.max_age_secs()),
        )
    }

    /// Append expiring copies of both cookies so the user agent drops them.
    pub fn invalidate(&self, headers: &mut HeaderMap) {
        let result = append_pair(
            headers,
            credential_cookie(ACCESS_TOKEN_COOKIE, "", 0),
            credential_cookie(REFRESH_TOKEN_COOKIE, "", 0),
        );
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to render clearing cookies");
        }
    }
}

/// Refresh token from the request cookies, if present and non-empty.
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn credential_cookie(name: &'static str, value: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

fn append_pair(
    headers: &mut HeaderMap,
    first: Cookie<'static>,
    second: Cookie<'static>,
) -> Result<(), InvalidHeaderValue> {
    let first = HeaderValue::from_str(&first.to_string())?;
    let second = HeaderValue::from_str(&second.to_string())?;
    headers.append(SET_COOKIE, first);
    headers.append(SET_COOKIE, second);
    Ok(())
}
