// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential delivery policy.

use super::client_type::ClientCategory;

/// Where issued credentials are placed in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryDecision {
    pub set_cookies: bool,
    /// Invariant: always true. Mobile and unknown clients only ever see
    /// the body, and cookie clients get the body as well. The session
    /// controller asserts this before writing a response.
    pub include_in_body: bool,
}

/// Decide how credentials reach a client of the given category.
pub fn decide(category: ClientCategory) -> DeliveryDecision {
    DeliveryDecision {
        set_cookies: category.receives_cookies(),
        include_in_body: true,
    }
}
