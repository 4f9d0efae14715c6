// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client classification from the request `Origin` header.
//!
//! Origins are matched against an ordered rule list loaded once at start-up.
//! The first rule whose code equals the origin byte-for-byte wins; anything
//! else (including a missing header) resolves to [`ClientCategory::Unknown`].

use serde::Serialize;
use utoipa::ToSchema;

/// Kind of application calling the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClientCategory {
    /// Browser front-end
    Web,
    /// Native mobile app (stores tokens itself)
    Mobile,
    /// Desktop and internal tooling
    Tools,
    /// Missing or unrecognised origin
    Unknown,
}

impl ClientCategory {
    /// Whether credentials may be delivered to this client as cookies.
    pub fn receives_cookies(&self) -> bool {
        matches!(self, ClientCategory::Web | ClientCategory::Tools)
    }

    /// Parse a configured client type. `unknown` is not configurable.
    pub fn from_config_type(s: &str) -> Option<ClientCategory> {
        match s {
            "web" => Some(ClientCategory::Web),
            "mobile" => Some(ClientCategory::Mobile),
            "tools" => Some(ClientCategory::Tools),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientCategory::Web => write!(f, "web"),
            ClientCategory::Mobile => write!(f, "mobile"),
            ClientCategory::Tools => write!(f, "tools"),
            ClientCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// One `{type, code}` entry of the client type configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRule {
    /// Exact origin string, e.g. `https://app.buddy.com`
    pub code: String,
    pub category: ClientCategory,
}

impl OriginRule {
    pub fn new(code: impl Into<String>, category: ClientCategory) -> Self {
        Self {
            code: code.into(),
            category,
        }
    }
}

/// Ordered, immutable set of origin rules.
#[derive(Debug, Clone, Default)]
pub struct ClientTypeRegistry {
    rules: Vec<OriginRule>,
}

impl ClientTypeRegistry {
    pub fn new(rules: Vec<OriginRule>) -> Self {
        Self { rules }
    }

    /// First configured rule whose code equals `origin`.
    pub fn lookup(&self, origin: &str) -> Option<ClientCategory> {
        self.rules
            .iter()
            .find(|rule| rule.code == origin)
            .map(|rule| rule.category)
    }

    pub fn rules(&self) -> &[OriginRule] {
        &self.rules
    }
}

/// Resolves request origins to client categories.
#[derive(Debug, Clone, Default)]
pub struct ClientTypeDetector {
    registry: ClientTypeRegistry,
}

impl ClientTypeDetector {
    pub fn new(registry: ClientTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn detect(&self, origin: Option<&str>) -> ClientCategory {
        origin
            .and_then(|value| self.registry.lookup(value))
            .unwrap_or(ClientCategory::Unknown)
    }

    pub fn registry(&self) -> &ClientTypeRegistry {
        &self.registry
    }
}
