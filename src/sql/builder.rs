//! Builds the two parameterized selects the repository issues. Identifiers come from validated config only; values are always parameters.

use crate::sql::{build_param, Dialect, RowLimit, SqlValue};

#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Record a parameter and return its placeholder for `dialect`.
    fn push_param(&mut self, v: SqlValue, dialect: Dialect) -> String {
        let idx = self.params.len();
        self.params.push(v);
        build_param(idx, dialect)
    }
}

/// `select * from <table> where <column> = <p0>` restricted to one row.
pub fn select_one_by_column(table: &str, column: &str, value: SqlValue, dialect: Dialect) -> QueryBuf {
    let mut q = QueryBuf::new();
    let p = q.push_param(value, dialect);
    q.sql = match dialect.row_limit() {
        RowLimit::Suffix(limit) => format!("select * from {} where {} = {} {}", table, column, p, limit),
        RowLimit::Predicate(pred) => format!("select * from {} where {} = {} {}", table, column, p, pred),
        RowLimit::Top(top) => format!("select {} * from {} where {} = {}", top, table, column, p),
    };
    q
}

/// `select * from <table> where <column> = <p0>`.
pub fn select_by_column(table: &str, column: &str, value: SqlValue, dialect: Dialect) -> QueryBuf {
    let mut q = QueryBuf::new();
    let p = q.push_param(value, dialect);
    q.sql = format!("select * from {} where {} = {}", table, column, p);
    q
}
