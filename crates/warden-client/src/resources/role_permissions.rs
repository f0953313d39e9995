//! Role-to-permission grant endpoints.
//!
//! Mirrors the user-role surface over the `(role_id, permission_id)` pair.

use warden_core::{
    AssignPermissionRequest, ResourceKind, Result, RolePermission, RolePermissionFilter, Tag,
};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;
use crate::resources::encode;
use crate::resources::user_roles::render_filter;

/// `/role-permissions` endpoints.
pub struct RolePermissionsApi<'a> {
    client: &'a WardenClient,
}

impl<'a> RolePermissionsApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists grants matching `filter`. An empty filter lists them all.
    pub async fn list(&self, filter: RolePermissionFilter) -> Result<Vec<RolePermission>> {
        let query = filter.to_query();
        let key = match render_filter(&query) {
            Some(param) => QueryKey::with_param("role_permissions.list", param),
            None => QueryKey::new("role_permissions.list"),
        };

        self.client
            .query(
                key,
                ApiRequest::get("/role-permissions").with_query(query),
                list_tags,
            )
            .await
    }

    /// Grants `permission_id` to `role_id`.
    pub async fn assign(&self, role_id: i64, permission_id: i64) -> Result<RolePermission> {
        let payload = AssignPermissionRequest {
            role_id,
            permission_id,
        };
        self.client
            .mutate(
                ApiRequest::post("/role-permissions").with_json(encode(&payload)?),
                invalidation_set(),
            )
            .await
    }

    /// Revokes `permission_id` from `role_id`.
    pub async fn remove(&self, role_id: i64, permission_id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::delete("/role-permissions").with_query(vec![
                    ("role_id", role_id.to_string()),
                    ("permission_id", permission_id.to_string()),
                ]),
                invalidation_set(),
            )
            .await
    }
}

fn list_tags(grants: &Vec<RolePermission>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = grants
        .iter()
        .map(|grant| Tag::id(ResourceKind::RolePermission, grant.id))
        .collect();
    tags.push(Tag::list(ResourceKind::RolePermission));
    tags
}

fn invalidation_set() -> Vec<Tag> {
    vec![
        Tag::list(ResourceKind::RolePermission),
        Tag::list(ResourceKind::Role),
        Tag::list(ResourceKind::Permission),
    ]
}
