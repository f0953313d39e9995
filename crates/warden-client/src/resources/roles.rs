//! Role endpoints.

use warden_core::{CreateRoleRequest, ResourceKind, Result, Role, Tag, UpdateRoleRequest};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;
use crate::resources::encode;

/// `/roles` endpoints.
pub struct RolesApi<'a> {
    client: &'a WardenClient,
}

impl<'a> RolesApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists all roles.
    pub async fn list(&self) -> Result<Vec<Role>> {
        self.client
            .query(QueryKey::new("roles.list"), ApiRequest::get("/roles"), list_tags)
            .await
    }

    /// Creates a role.
    pub async fn create(&self, request: CreateRoleRequest) -> Result<Role> {
        self.client
            .mutate(
                ApiRequest::post("/roles").with_json(encode(&request)?),
                vec![Tag::list(ResourceKind::Role)],
            )
            .await
    }

    /// Updates a role. Absent fields are left untouched.
    pub async fn update(&self, id: i64, request: UpdateRoleRequest) -> Result<Role> {
        self.client
            .mutate(
                ApiRequest::put(format!("/roles/{id}")).with_json(encode(&request)?),
                vec![Tag::id(ResourceKind::Role, id), Tag::list(ResourceKind::Role)],
            )
            .await
    }

    /// Deletes a role.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::delete(format!("/roles/{id}")),
                vec![Tag::id(ResourceKind::Role, id), Tag::list(ResourceKind::Role)],
            )
            .await
    }
}

fn list_tags(roles: &Vec<Role>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = roles
        .iter()
        .map(|role| Tag::id(ResourceKind::Role, role.id))
        .collect();
    tags.push(Tag::list(ResourceKind::Role));
    tags
}
