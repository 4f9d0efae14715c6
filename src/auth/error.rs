// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::credentials::IssuerError;

/// Failures of the login and refresh flows.
///
/// Every variant is terminal for the request: nothing is retried and no
/// cookies are written or cleared.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Identity verification was rejected
    #[error("Invalid email or password")]
    AuthenticationFailed,
    /// Refresh request carried no refresh token
    #[error("Refresh token is required")]
    MissingRefreshCredential,
    /// Refresh token expired, revoked or malformed
    #[error("Refresh token is invalid or expired")]
    InvalidRefreshCredential,
    /// Request body failed validation
    #[error("{0}")]
    InvalidRequest(String),
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::MissingRefreshCredential => "missing_refresh_credential",
            AuthError::InvalidRefreshCredential => "invalid_refresh_credential",
            AuthError::InvalidRequest(_) => "invalid_request",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationFailed
            | AuthError::MissingRefreshCredential
            | AuthError::InvalidRefreshCredential => StatusCode::UNAUTHORIZED,
            AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an issuer failure during login.
    pub fn from_login(err: IssuerError) -> Self {
        match err {
            IssuerError::Signing(msg) => AuthError::Internal(msg),
            _ => AuthError::AuthenticationFailed,
        }
    }

    /// Map an issuer failure during refresh.
    pub fn from_refresh(err: IssuerError) -> Self {
        match err {
            IssuerError::Signing(msg) => AuthError::Internal(msg),
            _ => AuthError::InvalidRefreshCredential,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Auth internal error");
        }
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
