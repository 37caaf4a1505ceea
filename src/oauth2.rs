//! OAuth2 client configuration model and the token-exchange collaborator.

use crate::error::TokenExchangeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One row of the OAuth2 client configuration table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: String,
    pub link: Option<String>,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub scope: Option<String>,
    pub redirect_uri: Option<String>,
    pub access_token_link: Option<String>,
    pub status: Option<String>,
}

crate::record! {
    impl Configuration {
        id: "column:id;primary_key",
        link: "column:link",
        client_id: "column:client_id",
        client_secret: "column:client_secret",
        scope: "column:scope",
        redirect_uri: "column:redirect_uri",
        access_token_link: "column:access_token_link",
        status: "column:status",
    }
}

/// Exchanges a client's credentials for a request token. One instance per configuration id.
#[async_trait]
pub trait OAuth2UserRepository: Send + Sync {
    async fn get_request_token(&self, client_id: &str, client_secret: &str) -> Result<String, TokenExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{bind_columns, Record};

    #[test]
    fn every_field_is_bound() {
        let map = bind_columns(&Configuration::descriptor()).unwrap();
        assert_eq!(map.len(), 8);
        assert_eq!(map.get("id"), Some(0));
        assert_eq!(map.get("CLIENT_SECRET"), Some(3));
        assert_eq!(map.get("status"), Some(7));
    }

    #[test]
    fn secret_is_not_serialized() {
        let cfg = Configuration {
            id: "google".into(),
            client_id: "cid".into(),
            client_secret: "shh".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["clientId"], "cid");
        assert!(json.get("clientSecret").is_none());
    }
}
