// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and refresh orchestration.
//!
//! ## Flow
//!
//! 1. Issue credentials through the [`CredentialIssuer`]
//! 2. Classify the caller from its `Origin` header
//! 3. Apply the delivery policy (cookies for web/tools only)
//! 4. Return the body with profiles and both tokens
//!
//! Errors short-circuit before step 2, so a failed request never carries
//! cookies or tokens, and existing client cookies are left alone.

use std::sync::Arc;

use axum::http::HeaderMap;

use super::client_type::ClientTypeDetector;
use super::cookies::CookieManager;
use super::credentials::{CredentialIssuer, SessionOutcome};
use super::delivery;
use super::error::AuthError;
use crate::models::{AuthResponse, LoginRequest};

/// Stateless per-request controller; cheap to clone into handlers.
#[derive(Clone)]
pub struct AuthSessionController {
    issuer: Arc<dyn CredentialIssuer>,
    detector: Arc<ClientTypeDetector>,
    cookies: CookieManager,
}

impl AuthSessionController {
    pub fn new(issuer: Arc<dyn CredentialIssuer>, detector: Arc<ClientTypeDetector>) -> Self {
        Self {
            issuer,
            detector,
            cookies: CookieManager::new(),
        }
    }

    /// Authenticate with email and password.
    ///
    /// `headers` receives the credential cookies when the caller's category
    /// accepts them.
    pub fn login(
        &self,
        request: &LoginRequest,
        origin: Option<&str>,
        headers: &mut HeaderMap,
    ) -> Result<AuthResponse, AuthError> {
        if request.email.trim().is_empty() {
            return Err(AuthError::InvalidRequest("email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::InvalidRequest("password is required".to_string()));
        }

        let outcome = self.issuer.authenticate(request).map_err(|e| {
            tracing::info!(error = %e, "Login rejected");
            AuthError::from_login(e)
        })?;

        self.deliver(outcome, origin, headers)
    }

    /// Exchange a refresh token for a new pair.
    pub fn refresh(
        &self,
        refresh_token: Option<&str>,
        origin: Option<&str>,
        headers: &mut HeaderMap,
    ) -> Result<AuthResponse, AuthError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshCredential)?;

        let outcome = self.issuer.reissue(token).map_err(|e| {
            tracing::info!(error = %e, "Refresh rejected");
            AuthError::from_refresh(e)
        })?;

        self.deliver(outcome, origin, headers)
    }

    /// Clear both credential cookies.
    pub fn logout(&self, headers: &mut HeaderMap) {
        self.cookies.invalidate(headers);
    }

    fn deliver(
        &self,
        outcome: SessionOutcome,
        origin: Option<&str>,
        headers: &mut HeaderMap,
    ) -> Result<AuthResponse, AuthError> {
        let category = self.detector.detect(origin);
        let decision = delivery::decide(category);
        // Tokens always travel in the body; cookies are additive.
        debug_assert!(decision.include_in_body);

        if decision.set_cookies {
            self.cookies
                .issue(headers, &outcome.access, &outcome.refresh)
                .map_err(|e| {
                    tracing::error!(error = %e, client = %category, "Failed to write credential cookies");
                    AuthError::Internal("credential cookies could not be written".to_string())
                })?;
        }

        tracing::debug!(
            client = %category,
            cookies = decision.set_cookies,
            profiles = outcome.profiles.len(),
            "Credentials delivered"
        );

        Ok(AuthResponse::from(outcome))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::header::SET_COOKIE;
    use uuid::Uuid;

    use super::*;
    use crate::auth::client_type::{ClientCategory, ClientTypeRegistry, OriginRule};
    use crate::auth::credentials::{Credential, CredentialKind, IssuerError};
    use crate::models::{ProfileSummary, ProfileType};

    /// Issuer that accepts one password and one refresh token.
    struct StubIssuer;

    fn outcome(tag: &str) -> SessionOutcome {
        SessionOutcome {
            access: Credential::new(
                format!("access-{tag}"),
                CredentialKind::Access,
                Duration::from_millis(3_600_000),
            ),
            refresh: Credential::new(
                format!("refresh-{tag}"),
                CredentialKind::Refresh,
                Duration::from_millis(7_200_000),
            ),
            profiles: vec![ProfileSummary {
                profile_id: Uuid::nil(),
                nickname: "mango".to_string(),
                profile_type: ProfileType::Adopter,
            }],
        }
    }

    impl CredentialIssuer for StubIssuer {
        fn authenticate(&self, request: &LoginRequest) -> Result<SessionOutcome, IssuerError> {
            if request.password == "pw" {
                Ok(outcome("login"))
            } else {
                Err(IssuerError::InvalidCredentials)
            }
        }

        fn reissue(&self, refresh_token: &str) -> Result<SessionOutcome, IssuerError> {
            match refresh_token {
                "good" => Ok(outcome("renewed")),
                "stale" => Err(IssuerError::Expired),
                _ => Err(IssuerError::Rejected("malformed token".to_string())),
            }
        }
    }

    /// Issuer whose tokens cannot be carried in a header.
    struct UnprintableIssuer;

    impl CredentialIssuer for UnprintableIssuer {
        fn authenticate(&self, _request: &LoginRequest) -> Result<SessionOutcome, IssuerError> {
            let mut outcome = outcome("login");
            outcome.refresh = Credential::new(
                "refresh\r\nX-Injected: 1",
                CredentialKind::Refresh,
                Duration::from_millis(7_200_000),
            );
            Ok(outcome)
        }

        fn reissue(&self, _refresh_token: &str) -> Result<SessionOutcome, IssuerError> {
            self.authenticate(&login_request("pw"))
        }
    }

    fn controller() -> AuthSessionController {
        let detector = ClientTypeDetector::new(ClientTypeRegistry::new(vec![
            OriginRule::new("https://app.buddy.com", ClientCategory::Web),
            OriginRule::new("buddy-mobile://app", ClientCategory::Mobile),
            OriginRule::new("mytool://local", ClientCategory::Tools),
        ]));
        AuthSessionController::new(Arc::new(StubIssuer), Arc::new(detector))
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            email: "kim@buddy.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_from_web_sets_cookies_and_body() {
        let mut headers = HeaderMap::new();
        let body = controller()
            .login(&login_request("pw"), Some("https://app.buddy.com"), &mut headers)
            .unwrap();

        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
        assert_eq!(body.access_token, "access-login");
        assert_eq!(body.refresh_token, "refresh-login");
        assert_eq!(body.profiles.len(), 1);
    }

    #[test]
    fn login_from_tools_sets_cookies() {
        let mut headers = HeaderMap::new();
        controller()
            .login(&login_request("pw"), Some("mytool://local"), &mut headers)
            .unwrap();
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn login_without_cookie_category_is_body_only() {
        for origin in [None, Some("buddy-mobile://app"), Some("https://elsewhere.example")] {
            let mut headers = HeaderMap::new();
            let body = controller()
                .login(&login_request("pw"), origin, &mut headers)
                .unwrap();
            assert!(headers.get(SET_COOKIE).is_none(), "{origin:?}");
            assert_eq!(body.access_token, "access-login");
            assert_eq!(body.refresh_token, "refresh-login");
        }
    }

    #[test]
    fn failed_login_writes_nothing() {
        let mut headers = HeaderMap::new();
        let result = controller().login(
            &login_request("wrong"),
            Some("https://app.buddy.com"),
            &mut headers,
        );
        assert!(matches!(result, Err(AuthError::AuthenticationFailed)));
        assert!(headers.is_empty());
    }

    #[test]
    fn empty_login_fields_are_invalid_requests() {
        let mut headers = HeaderMap::new();
        let mut request = login_request("pw");
        request.email = "  ".to_string();
        let result = controller().login(&request, None, &mut headers);
        assert!(matches!(result, Err(AuthError::InvalidRequest(_))));

        let result = controller().login(&login_request(""), None, &mut headers);
        assert!(matches!(result, Err(AuthError::InvalidRequest(_))));
    }

    #[test]
    fn refresh_reissues_and_applies_policy() {
        let mut headers = HeaderMap::new();
        let body = controller()
            .refresh(Some("good"), Some("https://app.buddy.com"), &mut headers)
            .unwrap();
        assert_eq!(body.access_token, "access-renewed");
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);

        let mut headers = HeaderMap::new();
        controller()
            .refresh(Some("good"), Some("buddy-mobile://app"), &mut headers)
            .unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn refresh_without_token_is_missing() {
        let mut headers = HeaderMap::new();
        let result = controller().refresh(None, Some("https://app.buddy.com"), &mut headers);
        assert!(matches!(result, Err(AuthError::MissingRefreshCredential)));

        let result = controller().refresh(Some(""), None, &mut headers);
        assert!(matches!(result, Err(AuthError::MissingRefreshCredential)));
        assert!(headers.is_empty());
    }

    #[test]
    fn rejected_refresh_is_invalid_and_writes_nothing() {
        for token in ["stale", "garbage"] {
            let mut headers = HeaderMap::new();
            let result =
                controller().refresh(Some(token), Some("https://app.buddy.com"), &mut headers);
            assert!(matches!(result, Err(AuthError::InvalidRefreshCredential)));
            assert!(headers.is_empty());
        }
    }

    #[test]
    fn logout_clears_both_cookies() {
        let mut headers = HeaderMap::new();
        controller().logout(&mut headers);
        let cookies: Vec<_> = headers.get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        for cookie in cookies {
            assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
        }
    }

    #[test]
    fn unwritable_cookie_fails_without_partial_headers() {
        let detector = ClientTypeDetector::new(ClientTypeRegistry::new(vec![
            OriginRule::new("https://app.buddy.com", ClientCategory::Web),
            OriginRule::new("buddy-mobile://app", ClientCategory::Mobile),
        ]));
        let controller = AuthSessionController::new(Arc::new(UnprintableIssuer), Arc::new(detector));

        let mut headers = HeaderMap::new();
        let result =
            controller.login(&login_request("pw"), Some("https://app.buddy.com"), &mut headers);
        assert!(matches!(result, Err(AuthError::Internal(_))));
        assert!(headers.is_empty());

        let mut headers = HeaderMap::new();
        let result = controller.refresh(Some("any"), Some("https://app.buddy.com"), &mut headers);
        assert!(matches!(result, Err(AuthError::Internal(_))));
        assert!(headers.is_empty());

        // Body-only clients never render cookies.
        let mut headers = HeaderMap::new();
        assert!(controller
            .login(&login_request("pw"), Some("buddy-mobile://app"), &mut headers)
            .is_ok());
    }
}
