//! Issued-token inventory endpoints.
//!
//! Token queries carry only the list tag: any revocation invalidates the
//! whole inventory.

use warden_core::{ResourceKind, Result, Tag, TokenInfo};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;

/// `/tokens` endpoints.
pub struct TokensApi<'a> {
    client: &'a WardenClient,
}

impl<'a> TokensApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists the account's active tokens.
    pub async fn active(&self) -> Result<Vec<TokenInfo>> {
        self.client
            .query(
                QueryKey::new("tokens.active"),
                ApiRequest::get("/tokens/active"),
                |_: &Vec<TokenInfo>| vec![Tag::list(ResourceKind::Token)],
            )
            .await
    }

    /// Revokes one token by id.
    pub async fn revoke(&self, id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::post(format!("/tokens/{id}/revoke")),
                vec![Tag::list(ResourceKind::Token)],
            )
            .await
    }

    /// Revokes every token except the one authenticating this call.
    pub async fn revoke_all(&self) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::post("/tokens/revoke-all"),
                vec![Tag::list(ResourceKind::Token)],
            )
            .await
    }
}
