//! Load repository config from the process environment, with `.env` support.

use crate::config::{validate, RepositoryConfig};
use crate::error::ConfigError;
use crate::mapping::RowErrorPolicy;

pub const ENV_TABLE: &str = "OAUTH2_CONFIG_TABLE";
pub const ENV_ID_COLUMN: &str = "OAUTH2_CONFIG_ID_COLUMN";
pub const ENV_STATUS_COLUMN: &str = "OAUTH2_CONFIG_STATUS_COLUMN";
pub const ENV_ACTIVE: &str = "OAUTH2_CONFIG_ACTIVE";
pub const ENV_ROW_ERRORS: &str = "OAUTH2_CONFIG_ROW_ERRORS";

impl RepositoryConfig {
    /// Reads `OAUTH2_CONFIG_*` variables after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty optional keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table = lookup(ENV_TABLE)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_TABLE))?;
        let mut config = RepositoryConfig::new(table);
        if let Some(v) = lookup(ENV_ID_COLUMN) {
            config.id_column = v;
        }
        if let Some(v) = lookup(ENV_STATUS_COLUMN) {
            config.status_column = v;
        }
        if let Some(v) = lookup(ENV_ACTIVE) {
            config.active_value = v;
        }
        if let Some(v) = lookup(ENV_ROW_ERRORS).filter(|v| !v.is_empty()) {
            config.row_errors = parse_row_errors(&v)?;
        }
        let config = config.normalized();
        validate(&config)?;
        Ok(config)
    }
}

fn parse_row_errors(v: &str) -> Result<RowErrorPolicy, ConfigError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "skip" => Ok(RowErrorPolicy::Skip),
        "abort" => Ok(RowErrorPolicy::Abort),
        _ => Err(ConfigError::Invalid {
            key: ENV_ROW_ERRORS,
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<RepositoryConfig, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        RepositoryConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn table_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(ENV_TABLE))));
        assert!(matches!(load(&[(ENV_TABLE, "")]), Err(ConfigError::Missing(ENV_TABLE))));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let cfg = load(&[(ENV_TABLE, "oauth2_configurations"), (ENV_STATUS_COLUMN, ""), (ENV_ACTIVE, "")]).unwrap();
        assert_eq!(cfg.status_column, "status");
        assert_eq!(cfg.active_value, "A");
        assert_eq!(cfg.id_column, "id");
    }

    #[test]
    fn overrides_and_policy() {
        let cfg = load(&[
            (ENV_TABLE, "auth.clients"),
            (ENV_STATUS_COLUMN, "state"),
            (ENV_ACTIVE, "enabled"),
            (ENV_ROW_ERRORS, "Abort"),
        ])
        .unwrap();
        assert_eq!(cfg.status_column, "state");
        assert_eq!(cfg.active_value, "enabled");
        assert_eq!(cfg.row_errors, RowErrorPolicy::Abort);
        assert!(load(&[(ENV_TABLE, "t"), (ENV_ROW_ERRORS, "sometimes")]).is_err());
    }

    #[test]
    fn invalid_identifier_rejected() {
        let err = load(&[(ENV_TABLE, "t;drop")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "table_name", .. }));
    }
}
