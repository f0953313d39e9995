//! Client entry point.
//!
//! [`WardenClient`] owns the three moving parts of the access layer: the
//! [`SessionManager`] holding credentials, the request [`Pipeline`] with its
//! 401 recovery, and the [`TagCache`] for query results. Resource APIs hang
//! off it as cheap borrowing handles, e.g. `client.users().list().await`.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use warden_core::{Result, Tag, WardenError, decode_data, decode_unit};

use crate::cache::{CacheStatsSnapshot, CacheSubscription, QueryKey, TagCache};
use crate::pipeline::{ApiRequest, Pipeline};
use crate::resources::{
    AuthApi, PermissionsApi, RolePermissionsApi, RolesApi, TokensApi, UserRolesApi, UsersApi,
};
use crate::session::{MemorySessionStore, SessionManager, SessionStore};

/// Client for a warden RBAC service.
pub struct WardenClient {
    pub(crate) session: Arc<SessionManager>,
    pub(crate) pipeline: Pipeline,
    pub(crate) cache: TagCache,
}

impl WardenClient {
    /// Starts building a client for the service at `base_url`.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> WardenClientBuilder {
        WardenClientBuilder::new(base_url)
    }

    /// Builds a client with an in-memory session, for short-lived use.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::InvalidUrl`] when `base_url` does not parse.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build().await
    }

    /// The session holding current credentials.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Marks every cached query intersecting `tags` as stale and notifies
    /// subscribers. Returns the number of entries that went stale.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        self.cache.invalidate(tags)
    }

    /// Subscribes to change notices for one cached query.
    #[must_use]
    pub fn subscribe(&self, key: QueryKey) -> CacheSubscription {
        self.cache.subscribe(key)
    }

    /// Cache statistics at this moment.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Authentication and password operations.
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// User accounts.
    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Roles.
    #[must_use]
    pub fn roles(&self) -> RolesApi<'_> {
        RolesApi::new(self)
    }

    /// Permissions.
    #[must_use]
    pub fn permissions(&self) -> PermissionsApi<'_> {
        PermissionsApi::new(self)
    }

    /// User-to-role assignments.
    #[must_use]
    pub fn user_roles(&self) -> UserRolesApi<'_> {
        UserRolesApi::new(self)
    }

    /// Role-to-permission grants.
    #[must_use]
    pub fn role_permissions(&self) -> RolePermissionsApi<'_> {
        RolePermissionsApi::new(self)
    }

    /// Issued token inventory.
    #[must_use]
    pub fn tokens(&self) -> TokensApi<'_> {
        TokensApi::new(self)
    }

    /// Runs a cached query: a fresh cache entry is served directly, anything
    /// else goes over the network and the decoded result is stored under
    /// `key` with the tags `provides` derives from it.
    pub(crate) async fn query<T>(
        &self,
        key: QueryKey,
        request: ApiRequest,
        provides: impl FnOnce(&T) -> Vec<Tag>,
    ) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "serving cached result");
            return serde_json::from_value(cached)
                .map_err(|err| WardenError::decode(format!("cached value for {key}: {err}")));
        }

        debug!(key = %key, path = %request.path(), "fetching");
        let response = self.pipeline.execute(&request).await?;
        let decoded: T = decode_data(response.status, &response.body)?;

        let value = serde_json::to_value(&decoded)
            .map_err(|err| WardenError::decode(format!("cannot cache result for {key}: {err}")))?;
        self.cache.insert(key, value, provides(&decoded));

        Ok(decoded)
    }

    /// Runs a mutation and, on success, invalidates the declared tags.
    pub(crate) async fn mutate<T>(&self, request: ApiRequest, invalidates: Vec<Tag>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.pipeline.execute(&request).await?;
        let decoded: T = decode_data(response.status, &response.body)?;
        self.cache.invalidate(&invalidates);
        Ok(decoded)
    }

    /// Runs a mutation whose success answer carries no payload.
    pub(crate) async fn mutate_unit(
        &self,
        request: ApiRequest,
        invalidates: Vec<Tag>,
    ) -> Result<()> {
        let response = self.pipeline.execute(&request).await?;
        decode_unit(response.status, &response.body)?;
        self.cache.invalidate(&invalidates);
        Ok(())
    }
}

impl std::fmt::Debug for WardenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardenClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`WardenClient`].
pub struct WardenClientBuilder {
    base_url: String,
    store: Option<Arc<dyn SessionStore>>,
    http: Option<reqwest::Client>,
}

impl WardenClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store: None,
            http: None,
        }
    }

    /// Uses `store` for session persistence. Defaults to an in-memory store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses a preconfigured HTTP client, e.g. with custom timeouts.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validates the base URL, restores any persisted session, and builds
    /// the client.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::InvalidUrl`] when the base URL does not parse
    /// or is not http(s).
    pub async fn build(self) -> Result<WardenClient> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|err| WardenError::invalid_url(format!("{}: {err}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WardenError::invalid_url(format!(
                "{}: expected an http or https URL",
                self.base_url
            )));
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));
        let session = Arc::new(SessionManager::restore(store).await);
        let http = self.http.unwrap_or_default();

        Ok(WardenClient {
            session: Arc::clone(&session),
            pipeline: Pipeline::new(http, self.base_url, session),
            cache: TagCache::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_rejects_invalid_base_url() {
        let err = WardenClient::connect("not a url").await.unwrap_err();
        assert!(matches!(err, WardenError::InvalidUrl { .. }));

        let err = WardenClient::connect("ftp://rbac.internal").await.unwrap_err();
        assert!(matches!(err, WardenError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_build_starts_signed_out_with_memory_store() {
        let client = WardenClient::connect("http://localhost:8000/api/v1")
            .await
            .unwrap();
        assert!(!client.session().is_authenticated().await);
        assert_eq!(client.cache_stats().size, 0);
    }
}
