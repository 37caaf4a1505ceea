//! Typed errors for row mapping, configuration and the repository.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("no rows in result set")]
    NoRows,
    #[error("type {type_name} is not a composite record")]
    NotComposite { type_name: String },
    #[error("column enumeration: {0}")]
    Columns(String),
    #[error("scan column '{column}': {reason}")]
    Scan { column: String, reason: String },
    #[error("scan arity: {columns} columns but {targets} targets")]
    Arity { columns: usize, targets: usize },
    #[error("cursor closed or not positioned on a row")]
    CursorClosed,
}

impl MapError {
    /// Schema errors are fatal to the current call; everything else is row-level.
    pub fn is_schema(&self) -> bool {
        matches!(self, MapError::NotComposite { .. } | MapError::Columns(_))
    }
}

/// Failure of the per-client token exchange. The configuration row is still returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenExchangeError {
    #[error("no token exchanger registered for configuration '{0}'")]
    NotRegistered(String),
    #[error("token exchange: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing config: {0}")]
    Missing(&'static str),
    #[error("invalid config {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RepositoryError {
    pub fn is_no_rows(&self) -> bool {
        matches!(self, RepositoryError::Map(MapError::NoRows))
    }
}
