// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the authentication endpoints. All types
//! derive `ToSchema` for the OpenAPI document served at `/docs`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionOutcome;

// =============================================================================
// Profiles
// =============================================================================

/// What a profile represents on the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    /// Individual looking to adopt
    Adopter,
    /// Profile acting on behalf of a shelter
    Shelter,
}

/// A profile owned by the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileSummary {
    pub profile_id: Uuid,
    pub nickname: String,
    pub profile_type: ProfileType,
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /v1/auth/login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login or refresh.
///
/// Tokens are always present so clients that cannot use cookies (mobile,
/// unknown origins) can store them; cookie clients may ignore them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthResponse {
    pub profiles: Vec<ProfileSummary>,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<SessionOutcome> for AuthResponse {
    fn from(outcome: SessionOutcome) -> Self {
        Self {
            profiles: outcome.profiles,
            access_token: outcome.access.token,
            refresh_token: outcome.refresh.token,
        }
    }
}
