//! SQL dialect classification from a connection's driver identity.

use crate::store::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    MySql,
    Mssql,
    Oracle,
    Unsupported,
}

/// How a dialect restricts a select to a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowLimit {
    /// Appended after the filter, e.g. `limit 1`.
    Suffix(&'static str),
    /// Extra predicate joined to the filter, e.g. `and rownum = 1`.
    Predicate(&'static str),
    /// Placed right after `select`, e.g. `top 1`.
    Top(&'static str),
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Mssql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::Unsupported => "unsupported",
        }
    }

    pub fn row_limit(&self) -> RowLimit {
        match self {
            Dialect::Oracle => RowLimit::Predicate("and rownum = 1"),
            Dialect::Mssql => RowLimit::Top("top 1"),
            Dialect::Postgres | Dialect::MySql | Dialect::Unsupported => RowLimit::Suffix("limit 1"),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver identity -> dialect table. Identities are matched exactly.
#[derive(Clone, Debug)]
pub struct DialectRegistry {
    by_driver: HashMap<String, Dialect>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        let mut registry = DialectRegistry::empty();
        // sqlx reports Database::NAME; the rest follow the same naming.
        registry.register("PostgreSQL", Dialect::Postgres);
        registry.register("MySQL", Dialect::MySql);
        registry.register("MSSQL", Dialect::Mssql);
        registry.register("Microsoft SQL Server", Dialect::Mssql);
        registry.register("Oracle", Dialect::Oracle);
        registry
    }
}

impl DialectRegistry {
    pub fn empty() -> Self {
        DialectRegistry {
            by_driver: HashMap::new(),
        }
    }

    /// Add or replace the dialect for a driver identity.
    pub fn register(&mut self, driver: impl Into<String>, dialect: Dialect) -> &mut Self {
        self.by_driver.insert(driver.into(), dialect);
        self
    }

    pub fn lookup(&self, driver: &str) -> Dialect {
        self.by_driver
            .get(driver)
            .copied()
            .unwrap_or(Dialect::Unsupported)
    }

    /// Classify a connection handle. A missing handle is `Unsupported`, not an error.
    pub fn resolve(&self, conn: Option<&dyn Connection>) -> Dialect {
        let Some(conn) = conn else {
            tracing::warn!("no connection handle; dialect unsupported");
            return Dialect::Unsupported;
        };
        let driver = conn.driver_name();
        let dialect = self.lookup(driver);
        if dialect == Dialect::Unsupported {
            tracing::warn!(driver = %driver, "unrecognized driver; falling back to positional placeholders");
        } else {
            tracing::debug!(driver = %driver, dialect = %dialect, "resolved dialect");
        }
        dialect
    }
}

/// Classify a connection handle against the built-in driver table.
pub fn resolve(conn: Option<&dyn Connection>) -> Dialect {
    static DEFAULT: OnceLock<DialectRegistry> = OnceLock::new();
    DEFAULT.get_or_init(DialectRegistry::default).resolve(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BufferedCursor, RowCursor};
    use crate::sql::SqlValue;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Connection for Named {
        fn driver_name(&self) -> &str {
            self.0
        }

        async fn query(&self, _sql: &str, _params: &[SqlValue]) -> Result<Box<dyn RowCursor>, sqlx::Error> {
            Ok(Box::new(BufferedCursor::empty()))
        }
    }

    #[test]
    fn resolves_known_drivers() {
        let cases = [
            ("PostgreSQL", Dialect::Postgres),
            ("MySQL", Dialect::MySql),
            ("MSSQL", Dialect::Mssql),
            ("Oracle", Dialect::Oracle),
        ];
        for (driver, expected) in cases {
            let conn = Named(driver);
            assert_eq!(resolve(Some(&conn)), expected, "driver {}", driver);
        }
    }

    #[test]
    fn unknown_and_missing_handles_are_unsupported() {
        assert_eq!(resolve(None), Dialect::Unsupported);
        assert_eq!(resolve(Some(&Named("SQLite"))), Dialect::Unsupported);
        assert_eq!(resolve(Some(&Named("postgresql"))), Dialect::Unsupported);
    }

    #[test]
    fn registration_extends_the_table() {
        let mut registry = DialectRegistry::default();
        registry.register("godror", Dialect::Oracle);
        assert_eq!(registry.resolve(Some(&Named("godror"))), Dialect::Oracle);
        assert_eq!(DialectRegistry::empty().lookup("PostgreSQL"), Dialect::Unsupported);
    }

    #[test]
    fn row_limit_per_dialect() {
        assert_eq!(Dialect::Postgres.row_limit(), RowLimit::Suffix("limit 1"));
        assert_eq!(Dialect::Unsupported.row_limit(), RowLimit::Suffix("limit 1"));
        assert_eq!(Dialect::Oracle.row_limit(), RowLimit::Predicate("and rownum = 1"));
        assert_eq!(Dialect::Mssql.row_limit(), RowLimit::Top("top 1"));
    }
}
