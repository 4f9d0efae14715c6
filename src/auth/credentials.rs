// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Issued credentials and the issuer seam.
//!
//! The session controller never looks inside a token. Everything about
//! signing, claims and validity belongs to the [`CredentialIssuer`]
//! implementation (see [`super::jwt::JwtCredentialIssuer`]).

use std::time::Duration;

use crate::models::{LoginRequest, ProfileSummary};

/// Which of the two credentials a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Access,
    Refresh,
}

impl CredentialKind {
    /// Value of the `typ` claim / cookie name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Access => "access",
            CredentialKind::Refresh => "refresh",
        }
    }
}

/// An opaque token together with its configured lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub kind: CredentialKind,
    pub lifetime: Duration,
}

impl Credential {
    pub fn new(token: impl Into<String>, kind: CredentialKind, lifetime: Duration) -> Self {
        Self {
            token: token.into(),
            kind,
            lifetime,
        }
    }

    /// Cookie `Max-Age`: the lifetime in whole seconds, truncated.
    pub fn max_age_secs(&self) -> i64 {
        i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX)
    }
}

// Token values must never reach the logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("kind", &self.kind)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Result of a successful login or refresh. Consumed immediately.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub access: Credential,
    pub refresh: Credential,
    pub profiles: Vec<ProfileSummary>,
}

/// Issuer failures.
#[derive(Debug, thiserror::Error)]
pub enum IssuerError {
    /// Email/password pair was not accepted.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    Expired,

    /// Malformed, bad signature, wrong kind, revoked.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// Token subject no longer maps to an account.
    #[error("unknown subject")]
    UnknownSubject,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Produces credential pairs for verified identities.
///
/// Calls are synchronous from the controller's point of view.
pub trait CredentialIssuer: Send + Sync + 'static {
    /// Verify the login credentials and issue a fresh pair.
    fn authenticate(&self, request: &LoginRequest) -> Result<SessionOutcome, IssuerError>;

    /// Validate a refresh token and issue a new pair for its subject.
    fn reissue(&self, refresh_token: &str) -> Result<SessionOutcome, IssuerError>;
}
