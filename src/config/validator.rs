//! Config validation. Table and column names end up in SQL text, so only plain identifiers pass.

use crate::config::RepositoryConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// Optionally schema-qualified SQL identifier.
const IDENTIFIER: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$";

fn identifier_re() -> Result<&'static Regex, ConfigError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER))
        .as_ref()
        .map_err(|e| ConfigError::Validation(format!("identifier pattern: {}", e)))
}

pub fn validate(config: &RepositoryConfig) -> Result<(), ConfigError> {
    if config.table_name.is_empty() {
        return Err(ConfigError::Missing("table_name"));
    }
    let re = identifier_re()?;
    for (key, value) in [
        ("table_name", &config.table_name),
        ("id_column", &config.id_column),
        ("status_column", &config.status_column),
    ] {
        if !re.is_match(value) {
            return Err(ConfigError::Invalid {
                key,
                value: value.clone(),
            });
        }
    }
    if config.active_value.is_empty() {
        return Err(ConfigError::Validation("active_value must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_identifier(s: &str) -> bool {
        identifier_re().unwrap().is_match(s)
    }

    #[test]
    fn accepts_plain_and_schema_qualified_names() {
        assert!(is_identifier("oauth2_configurations"));
        assert!(is_identifier("auth.oauth2_configurations"));
        assert!(validate(&RepositoryConfig::new("auth.clients")).is_ok());
    }

    #[test]
    fn pattern_is_compiled_once() {
        let first = identifier_re().unwrap();
        let second = identifier_re().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn rejects_injection_shaped_names() {
        for bad in ["", "1table", "t; drop table x", "t where 1=1", "a.b.c", "\"t\""] {
            assert!(!is_identifier(bad), "{bad}");
        }
        let err = validate(&RepositoryConfig::new("t").with_status("status or 1=1", "A")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "status_column", .. }));
    }

    #[test]
    fn missing_table_is_reported() {
        let err = validate(&RepositoryConfig::new("")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("table_name")));
    }
}
