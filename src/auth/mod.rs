// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Client-aware credential issuance for the Buddy API.
//!
//! ## Auth Flow
//!
//! 1. Client posts email/password to `/v1/auth/login`
//! 2. The issuer verifies the account and signs an access/refresh pair
//! 3. The caller is classified from its `Origin` header:
//!    - `web` and `tools` receive both tokens as `HttpOnly` cookies
//!    - `mobile` and unknown origins get them only in the JSON body
//! 4. `/v1/auth/refresh` repeats the same delivery with a renewed pair
//!
//! ## Security
//!
//! - Cookies are `Secure; HttpOnly; SameSite=Strict; Path=/`
//! - Unconfigured origins never receive ambient cookie credentials
//! - Refresh only accepts tokens whose `typ` claim is `refresh`
//! - Token values are never logged

pub mod accounts;
pub mod client_type;
pub mod cookies;
pub mod credentials;
pub mod delivery;
pub mod error;
pub mod jwt;
pub mod session;

pub use accounts::{Account, AccountDirectory, AccountError, InMemoryAccountDirectory};
pub use client_type::{ClientCategory, ClientTypeDetector, ClientTypeRegistry, OriginRule};
pub use cookies::{CookieManager, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use credentials::{Credential, CredentialIssuer, CredentialKind, IssuerError, SessionOutcome};
pub use delivery::{decide, DeliveryDecision};
pub use error::AuthError;
pub use jwt::JwtCredentialIssuer;
pub use session::AuthSessionController;
