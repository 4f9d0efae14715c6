// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 JWT credential issuer.
//!
//! ## Claims
//!
//! | Claim | Meaning |
//! |-------|---------|
//! | `sub` | account id (UUID) |
//! | `typ` | `access` or `refresh` |
//! | `iss` | configured issuer |
//! | `iat` / `exp` | issue and expiry time (Unix seconds) |
//! | `jti` | random token id |
//!
//! Refresh tokens are only accepted when `typ == "refresh"`, so an access
//! token can never be used to mint a new pair.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::{Account, AccountDirectory};
use super::credentials::{
    Credential, CredentialIssuer, CredentialKind, IssuerError, SessionOutcome,
};
use crate::config::TokenSettings;
use crate::models::LoginRequest;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    typ: String,
    iss: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Issues signed access/refresh pairs for accounts in an [`AccountDirectory`].
pub struct JwtCredentialIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    accounts: Arc<dyn AccountDirectory>,
}

impl JwtCredentialIssuer {
    pub fn new(settings: &TokenSettings, accounts: Arc<dyn AccountDirectory>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            access_lifetime: settings.access_lifetime,
            refresh_lifetime: settings.refresh_lifetime,
            accounts,
        }
    }

    fn lifetime(&self, kind: CredentialKind) -> Duration {
        match kind {
            CredentialKind::Access => self.access_lifetime,
            CredentialKind::Refresh => self.refresh_lifetime,
        }
    }

    /// Sign a token of `kind` for `subject`, issued at `issued_at`.
    pub(crate) fn encode_token(
        &self,
        subject: &Uuid,
        kind: CredentialKind,
        issued_at: i64,
    ) -> Result<Credential, IssuerError> {
        let lifetime = self.lifetime(kind);
        let lifetime_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: subject.to_string(),
            typ: kind.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime_secs),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IssuerError::Signing(e.to_string()))?;

        Ok(Credential::new(token, kind, lifetime))
    }

    fn issue_pair(&self, account: Account) -> Result<SessionOutcome, IssuerError> {
        let now = Utc::now().timestamp();
        let access = self.encode_token(&account.account_id, CredentialKind::Access, now)?;
        let refresh = self.encode_token(&account.account_id, CredentialKind::Refresh, now)?;

        Ok(SessionOutcome {
            access,
            refresh,
            profiles: account.profiles,
        })
    }

    fn verify(&self, token: &str, expected: CredentialKind) -> Result<Uuid, IssuerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IssuerError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    IssuerError::Rejected("invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    IssuerError::Rejected("invalid issuer".to_string())
                }
                _ => IssuerError::Rejected("malformed token".to_string()),
            })?;

        let claims = token_data.claims;
        if claims.typ != expected.as_str() {
            return Err(IssuerError::Rejected(format!(
                "expected {} token, got {}",
                expected.as_str(),
                claims.typ
            )));
        }

        Uuid::parse_str(&claims.sub).map_err(|_| IssuerError::Rejected("invalid subject".to_string()))
    }
}

impl CredentialIssuer for JwtCredentialIssuer {
    fn authenticate(&self, request: &LoginRequest) -> Result<SessionOutcome, IssuerError> {
        let account = self
            .accounts
            .verify(&request.email, &request.password)
            .ok_or(IssuerError::InvalidCredentials)?;
        self.issue_pair(account)
    }

    fn reissue(&self, refresh_token: &str) -> Result<SessionOutcome, IssuerError> {
        let account_id = self.verify(refresh_token, CredentialKind::Refresh)?;
        let account = self
            .accounts
            .find(&account_id)
            .ok_or(IssuerError::UnknownSubject)?;
        self.issue_pair(account)
    }
}
