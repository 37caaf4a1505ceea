//! Repository configuration.

use crate::mapping::RowErrorPolicy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Table holding one OAuth2 client configuration per row.
    pub table_name: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_status_column")]
    pub status_column: String,
    /// Status value that marks a configuration as active.
    #[serde(default = "default_active_value")]
    pub active_value: String,
    #[serde(default)]
    pub row_errors: RowErrorPolicy,
}

pub fn default_id_column() -> String {
    "id".into()
}

pub fn default_status_column() -> String {
    "status".into()
}

pub fn default_active_value() -> String {
    "A".into()
}

impl RepositoryConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        RepositoryConfig {
            table_name: table_name.into(),
            id_column: default_id_column(),
            status_column: default_status_column(),
            active_value: default_active_value(),
            row_errors: RowErrorPolicy::default(),
        }
    }

    pub fn with_status(mut self, column: impl Into<String>, active: impl Into<String>) -> Self {
        self.status_column = column.into();
        self.active_value = active.into();
        self
    }

    pub fn with_row_errors(mut self, policy: RowErrorPolicy) -> Self {
        self.row_errors = policy;
        self
    }

    /// Empty status column or active value fall back to the defaults.
    pub fn normalized(mut self) -> Self {
        if self.id_column.is_empty() {
            self.id_column = default_id_column();
        }
        if self.status_column.is_empty() {
            self.status_column = default_status_column();
        }
        if self.active_value.is_empty() {
            self.active_value = default_active_value();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults() {
        let cfg: RepositoryConfig = serde_json::from_str(r#"{"table_name":"oauth2_configurations"}"#).unwrap();
        assert_eq!(cfg, RepositoryConfig::new("oauth2_configurations"));
        assert_eq!(cfg.active_value, "A");
        assert_eq!(cfg.row_errors, RowErrorPolicy::Skip);
    }

    #[test]
    fn json_row_error_policy() {
        let cfg: RepositoryConfig =
            serde_json::from_str(r#"{"table_name":"t","row_errors":"abort"}"#).unwrap();
        assert_eq!(cfg.row_errors, RowErrorPolicy::Abort);
    }

    #[test]
    fn normalized_fills_empty_values() {
        let cfg = RepositoryConfig::new("t").with_status("", "").normalized();
        assert_eq!(cfg.status_column, "status");
        assert_eq!(cfg.active_value, "A");
    }
}
