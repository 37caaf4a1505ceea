//! SQL-backed repository for OAuth2 client configurations.

use crate::config::{validate, RepositoryConfig};
use crate::error::{RepositoryError, TokenExchangeError};
use crate::mapping::{scan_all, scan_one, shared_bindings, BindingMap};
use crate::oauth2::{Configuration, OAuth2UserRepository};
use crate::sql::{resolve, select_by_column, select_one_by_column, Dialect, QueryBuf};
use crate::store::{Connection, CursorGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// A configuration row plus the outcome of its token exchange.
///
/// A failed exchange does not discard the row.
#[derive(Debug)]
pub struct ExchangedConfiguration {
    pub configuration: Configuration,
    pub token: Result<String, TokenExchangeError>,
}

pub struct SqlConfigurationRepository<C> {
    conn: C,
    config: RepositoryConfig,
    exchangers: HashMap<String, Arc<dyn OAuth2UserRepository>>,
    dialect: Dialect,
    bindings: Arc<BindingMap>,
}

impl<C: Connection> SqlConfigurationRepository<C> {
    /// Validates config, resolves the dialect and fetches the shared binding map.
    pub fn new(
        conn: C,
        config: RepositoryConfig,
        exchangers: HashMap<String, Arc<dyn OAuth2UserRepository>>,
    ) -> Result<Self, RepositoryError> {
        let config = config.normalized();
        validate(&config)?;
        let dialect = resolve(Some(&conn));
        let bindings = shared_bindings::<Configuration>()?;
        Ok(SqlConfigurationRepository {
            conn,
            config,
            exchangers,
            dialect,
            bindings,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Fetch one configuration by id, then exchange its client credentials for a token.
    ///
    /// No exchange happens when the id matches no row.
    pub async fn get_configuration(&self, id: &str) -> Result<ExchangedConfiguration, RepositoryError> {
        let q = select_one_by_column(&self.config.table_name, &self.config.id_column, id.into(), self.dialect);
        let mut configuration = Configuration::default();
        {
            let mut guard = self.open(&q).await?;
            scan_one(guard.cursor(), &mut configuration, &self.bindings)?;
        }
        let token = self.exchange(id, &configuration).await;
        Ok(ExchangedConfiguration { configuration, token })
    }

    /// Fetch every configuration whose status equals the configured active value.
    pub async fn get_configurations(&self) -> Result<Vec<Configuration>, RepositoryError> {
        let q = select_by_column(
            &self.config.table_name,
            &self.config.status_column,
            self.config.active_value.as_str().into(),
            self.dialect,
        );
        let mut guard = self.open(&q).await?;
        let mut models = Vec::new();
        let summary = scan_all(guard.cursor(), &mut models, &self.bindings, self.config.row_errors)?;
        if summary.skipped > 0 {
            tracing::warn!(
                table = %self.config.table_name,
                appended = summary.appended,
                skipped = summary.skipped,
                "partial configuration list"
            );
        }
        Ok(models)
    }

    async fn open(&self, q: &QueryBuf) -> Result<CursorGuard, RepositoryError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, dialect = %self.dialect, "query");
        let cursor = self.conn.query(&q.sql, &q.params).await?;
        Ok(CursorGuard::new(cursor))
    }

    async fn exchange(&self, id: &str, configuration: &Configuration) -> Result<String, TokenExchangeError> {
        let exchanger = self
            .exchangers
            .get(id)
            .ok_or_else(|| TokenExchangeError::NotRegistered(id.to_string()))?;
        exchanger
            .get_request_token(&configuration.client_id, &configuration.client_secret)
            .await
            .inspect_err(|e| tracing::warn!(id = %id, error = %e, "token exchange failed"))
    }
}
