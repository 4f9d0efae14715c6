// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret | Required |
//! | `JWT_ISSUER` | `iss` claim of issued tokens | `buddy` |
//! | `ACCESS_TOKEN_EXPIRATION_MS` | Access token lifetime (ms) | `3600000` |
//! | `REFRESH_TOKEN_EXPIRATION_MS` | Refresh token lifetime (ms) | `1209600000` |
//! | `CLIENT_TYPES` | JSON list of `{"type","code"}` origin rules | `[]` |
//! | `SEED_ACCOUNT_EMAIL` | Development account email | Optional |
//! | `SEED_ACCOUNT_PASSWORD` | Development account password | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use serde::Deserialize;

use crate::auth::{ClientCategory, OriginRule};
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const ACCESS_TOKEN_EXPIRATION_ENV: &str = "ACCESS_TOKEN_EXPIRATION_MS";
pub const REFRESH_TOKEN_EXPIRATION_ENV: &str = "REFRESH_TOKEN_EXPIRATION_MS";

/// Origin rules, e.g.
/// `[{"type":"web","code":"https://app.buddy.com"},{"type":"tools","code":"mytool://local"}]`.
/// Order matters: the first matching code wins.
pub const CLIENT_TYPES_ENV: &str = "CLIENT_TYPES";

pub const SEED_ACCOUNT_EMAIL_ENV: &str = "SEED_ACCOUNT_EMAIL";
pub const SEED_ACCOUNT_PASSWORD_ENV: &str = "SEED_ACCOUNT_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ISSUER: &str = "buddy";
/// One hour.
const DEFAULT_ACCESS_TOKEN_MS: u64 = 3_600_000;
/// Fourteen days.
const DEFAULT_REFRESH_TOKEN_MS: u64 = 1_209_600_000;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Token signing and lifetime settings.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish()
    }
}

/// Development account created at startup.
#[derive(Clone)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
}

/// Full process configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub tokens: TokenSettings,
    pub client_rules: Vec<OriginRule>,
    pub seed_account: Option<SeedAccount>,
    pub log_format: LogFormat,
}

#[derive(Deserialize)]
struct ClientTypeEntry {
    #[serde(rename = "type")]
    kind: String,
    code: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                var: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let issuer = lookup(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let access_ms = parse_millis(&lookup, ACCESS_TOKEN_EXPIRATION_ENV, DEFAULT_ACCESS_TOKEN_MS)?;
        let refresh_ms =
            parse_millis(&lookup, REFRESH_TOKEN_EXPIRATION_ENV, DEFAULT_REFRESH_TOKEN_MS)?;

        let client_rules = match lookup(CLIENT_TYPES_ENV) {
            Some(raw) => parse_client_types(&raw)?,
            None => Vec::new(),
        };

        let seed_account = match (lookup(SEED_ACCOUNT_EMAIL_ENV), lookup(SEED_ACCOUNT_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAccount { email, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    var: SEED_ACCOUNT_EMAIL_ENV,
                    reason: format!("{SEED_ACCOUNT_EMAIL_ENV} and {SEED_ACCOUNT_PASSWORD_ENV} must be set together"),
                })
            }
        };

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            tokens: TokenSettings {
                secret,
                issuer,
                access_lifetime: Duration::from_millis(access_ms),
                refresh_lifetime: Duration::from_millis(refresh_ms),
            },
            client_rules,
            seed_account,
            log_format,
        })
    }
}

fn parse_millis<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
            var,
            reason: format!("{e}"),
        }),
        None => Ok(default),
    }
}

/// Parse the `CLIENT_TYPES` JSON list, keeping configured order.
pub fn parse_client_types(raw: &str) -> Result<Vec<OriginRule>, ConfigError> {
    let entries: Vec<ClientTypeEntry> =
        serde_json::from_str(raw).map_err(|e| ConfigError::Invalid {
            var: CLIENT_TYPES_ENV,
            reason: e.to_string(),
        })?;

    entries
        .into_iter()
        .map(|entry| {
            if entry.code == "*" {
                return Err(ConfigError::Invalid {
                    var: CLIENT_TYPES_ENV,
                    reason: "wildcard origin '*' is not allowed; list exact origins".to_string(),
                });
            }
            let category =
                ClientCategory::from_config_type(&entry.kind).ok_or_else(|| ConfigError::Invalid {
                    var: CLIENT_TYPES_ENV,
                    reason: format!("unknown client type '{}'", entry.kind),
                })?;
            Ok(OriginRule::new(entry.code, category))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_set() {
        let config = AppConfig::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "s3cret")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.tokens.issuer, "buddy");
        assert_eq!(config.tokens.access_lifetime, Duration::from_secs(3600));
        assert_eq!(config.tokens.refresh_lifetime, Duration::from_secs(1_209_600));
        assert!(config.client_rules.is_empty());
        assert!(config.seed_account.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn secret_is_required() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing(JWT_SECRET_ENV))));
    }

    #[test]
    fn lifetimes_keep_millisecond_precision() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s"),
            (ACCESS_TOKEN_EXPIRATION_ENV, "1500"),
            (REFRESH_TOKEN_EXPIRATION_ENV, "7200000"),
        ]))
        .unwrap();
        assert_eq!(config.tokens.access_lifetime, Duration::from_millis(1500));
        assert_eq!(config.tokens.refresh_lifetime, Duration::from_secs(7200));
    }

    #[test]
    fn invalid_lifetime_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s"),
            (ACCESS_TOKEN_EXPIRATION_ENV, "-5"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: ACCESS_TOKEN_EXPIRATION_ENV, .. })
        ));
    }

    #[test]
    fn client_types_preserve_order() {
        let rules = parse_client_types(
            r#"[{"type":"web","code":"https://app.buddy.com"},
                {"type":"mobile","code":"buddy-mobile://app"},
                {"type":"tools","code":"mytool://local"}]"#,
        )
        .unwrap();
        assert_eq!(
            rules,
            vec![
                OriginRule::new("https://app.buddy.com", ClientCategory::Web),
                OriginRule::new("buddy-mobile://app", ClientCategory::Mobile),
                OriginRule::new("mytool://local", ClientCategory::Tools),
            ]
        );
    }

    #[test]
    fn client_types_reject_unknown_type() {
        let result = parse_client_types(r#"[{"type":"desktop","code":"x://y"}]"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = parse_client_types(r#"[{"type":"unknown","code":"x://y"}]"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        assert!(parse_client_types("not json").is_err());
    }

    #[test]
    fn client_types_reject_wildcard_origin() {
        let result = parse_client_types(r#"[{"type":"web","code":"*"}]"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: CLIENT_TYPES_ENV, .. })
        ));

        let result = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s"),
            (CLIENT_TYPES_ENV, r#"[{"type":"tools","code":"mytool://local"},{"type":"web","code":"*"}]"#),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn seed_account_requires_both_fields() {
        let result = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s"),
            (SEED_ACCOUNT_EMAIL_ENV, "kim@buddy.com"),
        ]));
        assert!(result.is_err());

        let config = AppConfig::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "s"),
            (SEED_ACCOUNT_EMAIL_ENV, "kim@buddy.com"),
            (SEED_ACCOUNT_PASSWORD_ENV, "pw"),
        ]))
        .unwrap();
        assert_eq!(config.seed_account.unwrap().email, "kim@buddy.com");
    }
}
