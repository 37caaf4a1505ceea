//! OAuth2 client configuration repository over a driver-agnostic row mapper.
//!
//! The mapper resolves the SQL dialect from a connection, renders placeholders,
//! binds result columns to record fields through `column:` tags and scans rows
//! into records without per-type code.

pub mod config;
pub mod error;
pub mod mapping;
pub mod oauth2;
pub mod repository;
pub mod sql;
pub mod store;

pub use config::{validate, RepositoryConfig};
pub use error::{ConfigError, MapError, RepositoryError, TokenExchangeError};
pub use mapping::{bind_columns, scan_all, scan_one, BindingCache, BindingMap, Record, RowErrorPolicy, ScanSummary, ScanTarget, TypeDescriptor};
pub use oauth2::{Configuration, OAuth2UserRepository};
pub use repository::{ExchangedConfiguration, SqlConfigurationRepository};
pub use sql::{build_param, resolve, Dialect, DialectRegistry, SqlValue};
pub use store::{BufferedCursor, Connection, CursorGuard, RowCursor};
