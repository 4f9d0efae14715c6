// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    AccountDirectory, AuthSessionController, ClientTypeDetector, ClientTypeRegistry,
    CredentialIssuer, JwtCredentialIssuer,
};
use crate::config::TokenSettings;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthSessionController,
    pub detector: Arc<ClientTypeDetector>,
}

impl AppState {
    pub fn new(issuer: Arc<dyn CredentialIssuer>, detector: ClientTypeDetector) -> Self {
        let detector = Arc::new(detector);
        Self {
            auth: AuthSessionController::new(issuer, detector.clone()),
            detector,
        }
    }

    /// State backed by the JWT issuer over `accounts`.
    pub fn with_jwt_issuer(
        tokens: &TokenSettings,
        accounts: Arc<dyn AccountDirectory>,
        registry: ClientTypeRegistry,
    ) -> Self {
        let issuer = Arc::new(JwtCredentialIssuer::new(tokens, accounts));
        Self::new(issuer, ClientTypeDetector::new(registry))
    }
}
