//! Process configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `JWT_SECRET` | insecure dev value (warned) |
//! | `TOKEN_TTL_SECS` | `86400` |
//! | `USE_PERSISTENT_STORES` | `false` (in-memory store) |
//! | `DATABASE_URL` | built from `DB_USER`/`DB_PASSWORD`/`DB_HOST`/`DB_PORT`/`DB_NAME` |
//! | `DB_MAX_CONNECTIONS` | `5` |
//! | `BLOGS_FILE` | `data/blogs.json` |

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("USE_PERSISTENT_STORES=true requires DATABASE_URL or DB_USER + DB_PASSWORD")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub blogs_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset, so `.env` placeholders like `DB_USER=`
    /// fall back to defaults.
    pub fn from_lookup(raw: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| raw(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let ttl_secs: i64 = parse_or(&lookup, "TOKEN_TTL_SECS", 86_400)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: ttl_secs.to_string(),
                reason: "must be positive".into(),
            });
        }

        let use_persistent_stores = parse_or(&lookup, "USE_PERSISTENT_STORES", false)?;
        let database_url = lookup("DATABASE_URL").or_else(|| database_url_from_parts(&lookup));
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            use_persistent_stores,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            blogs_file: lookup("BLOGS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/blogs.json")),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn database_url_from_parts(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let user = lookup("DB_USER")?;
    let password = lookup("DB_PASSWORD")?;
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let name = lookup("DB_NAME").unwrap_or_else(|| "justice_lawyer".to_string());
    Some(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.token_ttl, Duration::days(1));
        assert!(!cfg.use_persistent_stores);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.blogs_file, PathBuf::from("data/blogs.json"));
    }

    #[test]
    fn database_url_is_built_from_credentials() {
        let cfg = config(&[("DB_USER", "lawyer"), ("DB_PASSWORD", "s3cret"), ("DB_HOST", "db")]).unwrap();
        assert_eq!(
            cfg.database_url.as_deref(),
            Some("postgres://lawyer:s3cret@db:5432/justice_lawyer")
        );
    }

    #[test]
    fn explicit_database_url_wins() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://x@y/z"),
            ("DB_USER", "lawyer"),
            ("DB_PASSWORD", "s3cret"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://x@y/z"));
    }

    #[test]
    fn persistent_stores_need_a_database() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err(),
            ConfigError::MissingDatabaseUrl
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("DB_USER", ""), ("DB_PASSWORD", ""), ("PORT", " ")]).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.port, 5000);

        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true"), ("DB_USER", ""), ("DB_PASSWORD", "")])
                .unwrap_err(),
            ConfigError::MissingDatabaseUrl
        );
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = config(&[("TOKEN_TTL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. }));
    }
}
