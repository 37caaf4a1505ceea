//! Example consumer: lists active OAuth2 configurations and exchanges a token for one of them.
//!
//! Run from repo root: `cargo run -p example-consumer -- [configuration-id]`

use async_trait::async_trait;
use oauth2_config_repo::{
    OAuth2UserRepository, RepositoryConfig, SqlConfigurationRepository, TokenExchangeError,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Stand-in exchanger; a real deployment plugs in one provider client per configuration id.
struct EchoExchanger;

#[async_trait]
impl OAuth2UserRepository for EchoExchanger {
    async fn get_request_token(&self, client_id: &str, _client_secret: &str) -> Result<String, TokenExchangeError> {
        Ok(format!("demo-token-for-{}", client_id))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("oauth2_config_repo=debug,example_consumer=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/oauth2".into());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let config = RepositoryConfig::from_env()?;
    let lister = SqlConfigurationRepository::new(pool.clone(), config.clone(), HashMap::new())?;
    let active = lister.get_configurations().await?;
    tracing::info!(count = active.len(), dialect = %lister.dialect(), "active configurations");
    for c in &active {
        tracing::info!(id = %c.id, client_id = %c.client_id, "configuration");
    }

    let Some(id) = std::env::args().nth(1) else {
        return Ok(());
    };
    let mut exchangers: HashMap<String, Arc<dyn OAuth2UserRepository>> = HashMap::new();
    exchangers.insert(id.clone(), Arc::new(EchoExchanger));
    let repo = SqlConfigurationRepository::new(pool, config, exchangers)?;
    match repo.get_configuration(&id).await {
        Ok(found) => match found.token {
            Ok(token) => tracing::info!(id = %id, token = %token, "token exchanged"),
            Err(e) => tracing::warn!(id = %id, error = %e, "configuration found, token exchange failed"),
        },
        Err(e) if e.is_no_rows() => tracing::warn!(id = %id, "no such configuration"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
