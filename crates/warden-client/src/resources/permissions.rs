//! Permission endpoints.

use warden_core::{
    CreatePermissionRequest, Permission, ResourceKind, Result, Tag, UpdatePermissionRequest,
};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;
use crate::resources::encode;

/// `/permissions` endpoints.
pub struct PermissionsApi<'a> {
    client: &'a WardenClient,
}

impl<'a> PermissionsApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists all permissions.
    pub async fn list(&self) -> Result<Vec<Permission>> {
        self.client
            .query(
                QueryKey::new("permissions.list"),
                ApiRequest::get("/permissions"),
                list_tags,
            )
            .await
    }

    /// Fetches one permission.
    pub async fn get(&self, id: i64) -> Result<Permission> {
        self.client
            .query(
                QueryKey::with_param("permissions.get", id.to_string()),
                ApiRequest::get(format!("/permissions/{id}")),
                |permission: &Permission| vec![Tag::id(ResourceKind::Permission, permission.id)],
            )
            .await
    }

    /// Creates a permission.
    pub async fn create(&self, request: CreatePermissionRequest) -> Result<Permission> {
        self.client
            .mutate(
                ApiRequest::post("/permissions").with_json(encode(&request)?),
                vec![Tag::list(ResourceKind::Permission)],
            )
            .await
    }

    /// Updates a permission. Absent fields are left untouched.
    pub async fn update(&self, id: i64, request: UpdatePermissionRequest) -> Result<Permission> {
        self.client
            .mutate(
                ApiRequest::put(format!("/permissions/{id}")).with_json(encode(&request)?),
                vec![
                    Tag::id(ResourceKind::Permission, id),
                    Tag::list(ResourceKind::Permission),
                ],
            )
            .await
    }

    /// Deletes a permission.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::delete(format!("/permissions/{id}")),
                vec![
                    Tag::id(ResourceKind::Permission, id),
                    Tag::list(ResourceKind::Permission),
                ],
            )
            .await
    }
}

fn list_tags(permissions: &Vec<Permission>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = permissions
        .iter()
        .map(|permission| Tag::id(ResourceKind::Permission, permission.id))
        .collect();
    tags.push(Tag::list(ResourceKind::Permission));
    tags
}
