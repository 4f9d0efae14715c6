// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, refresh and logout endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::{cookies::refresh_token_from, AuthError},
    models::{AuthResponse, LoginRequest},
    state::AppState,
};

/// Header carrying the refresh token for clients without cookies.
pub const REFRESH_TOKEN_HEADER: &str = "authorization-refresh";

fn origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|v| v.to_str().ok())
}

/// Refresh token from the `refresh_token` cookie, falling back to
/// `Authorization-Refresh: Bearer <token>`.
fn refresh_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    refresh_token_from(jar).or_else(|| {
        headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Authenticate with email and password.
///
/// Web and tools origins additionally receive both tokens as cookies.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    let Json(request) = payload.map_err(|e| AuthError::InvalidRequest(e.body_text()))?;

    let mut response_headers = HeaderMap::new();
    let body = state
        .auth
        .login(&request, origin(&headers), &mut response_headers)?;

    tracing::info!(profiles = body.profiles.len(), "Login successful");
    Ok((response_headers, Json(body)))
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    params(
        ("Authorization-Refresh" = Option<String>, Header, description = "`Bearer <refresh token>` when no cookie is sent")
    ),
    responses(
        (status = 200, description = "Credentials renewed", body = AuthResponse),
        (status = 401, description = "Refresh token missing, invalid or expired"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    let token = refresh_token(&jar, &headers);

    let mut response_headers = HeaderMap::new();
    let body = state
        .auth
        .refresh(token.as_deref(), origin(&headers), &mut response_headers)?;

    tracing::info!("Credentials refreshed");
    Ok((response_headers, Json(body)))
}

/// Clear the credential cookies.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Cookies cleared"))
)]
pub async fn logout(State(state): State<AppState>) -> (StatusCode, HeaderMap) {
    let mut response_headers = HeaderMap::new();
    state.auth.logout(&mut response_headers);
    (StatusCode::NO_CONTENT, response_headers)
}
