// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Buddy Server - Pet Adoption Platform Authentication Service
//!
//! Authenticates accounts and delivers access/refresh credentials in the way
//! each calling client expects: secure cookies for browser and tooling
//! origins, JSON body fields for everyone.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Client detection, delivery policy, cookies, JWT issuance
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod state;
