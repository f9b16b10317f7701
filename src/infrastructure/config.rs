use std::env;
use std::fmt;
use std::time::Duration;

use crate::services::relation_sync::SyncStrategy;

/// Where the catalog tables live
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Hosted PostgREST endpoint (Supabase)
    Supabase { url: String, api_key: String },
    /// Direct SQL connection through SeaORM
    Database { url: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: Backend,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub sync_strategy: SyncStrategy,
    pub cascade_bulk_delete: bool,
    pub request_timeout: Duration,
}

/// Startup configuration problems. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(
                f,
                "{} is not set (set SUPABASE_URL and SUPABASE_ANON_KEY, or DATABASE_URL)",
                key
            ),
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("DATABASE_URL") {
            Some(url) => Backend::Database { url },
            None => Backend::Supabase {
                url: get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                api_key: get("SUPABASE_ANON_KEY")
                    .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            },
        };

        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: p,
            })?,
            None => 8000,
        };

        let sync_strategy = match get("SYNC_STRATEGY") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
                key: "SYNC_STRATEGY",
                value: s,
            })?,
            None => SyncStrategy::default(),
        };

        let cascade_bulk_delete = match get("CASCADE_BULK_DELETE") {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid {
                key: "CASCADE_BULK_DELETE",
                value: v,
            })?,
            None => false,
        };

        let request_timeout = match get("SUPABASE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().map_err(|_| ConfigError::Invalid {
                key: "SUPABASE_TIMEOUT_SECS",
                value: v,
            })?),
            None => Duration::from_secs(10),
        };

        Ok(Self {
            backend,
            port,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            sync_strategy,
            cascade_bulk_delete,
            request_timeout,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_supabase_backend_with_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(
            config.backend,
            Backend::Supabase {
                url: "https://demo.supabase.co".to_string(),
                api_key: "anon".to_string()
            }
        );
        assert_eq!(config.port, 8000);
        assert_eq!(config.sync_strategy, SyncStrategy::ReplaceAll);
        assert!(!config.cascade_bulk_delete);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://demo.supabase.co")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));

        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SYNC_STRATEGY", "diff"),
            ("CASCADE_BULK_DELETE", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, http://admin.local"),
        ]))
        .unwrap();

        assert_eq!(
            config.backend,
            Backend::Database {
                url: "sqlite::memory:".to_string()
            }
        );
        assert_eq!(config.sync_strategy, SyncStrategy::Diff);
        assert!(config.cascade_bulk_delete);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "http://admin.local"]
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SYNC_STRATEGY", "merge"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SYNC_STRATEGY", .. }));
    }
}
