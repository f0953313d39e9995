//! User-to-role assignment endpoints.
//!
//! Assignments tie two entities together, so assigning or removing one
//! invalidates the assignment list and both entity lists.

use warden_core::{AssignRoleRequest, ResourceKind, Result, Tag, UserRole, UserRoleFilter};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;
use crate::resources::encode;

/// `/user-roles` endpoints.
pub struct UserRolesApi<'a> {
    client: &'a WardenClient,
}

impl<'a> UserRolesApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists assignments matching `filter`. An empty filter lists them all.
    ///
    /// Filtering happens server-side; each filter variant caches under its
    /// own key.
    pub async fn list(&self, filter: UserRoleFilter) -> Result<Vec<UserRole>> {
        let query = filter.to_query();
        let key = match render_filter(&query) {
            Some(param) => QueryKey::with_param("user_roles.list", param),
            None => QueryKey::new("user_roles.list"),
        };

        self.client
            .query(
                key,
                ApiRequest::get("/user-roles").with_query(query),
                list_tags,
            )
            .await
    }

    /// Assigns `role_id` to `user_id`.
    pub async fn assign(&self, user_id: i64, role_id: i64) -> Result<UserRole> {
        let payload = AssignRoleRequest { user_id, role_id };
        self.client
            .mutate(
                ApiRequest::post("/user-roles").with_json(encode(&payload)?),
                invalidation_set(),
            )
            .await
    }

    /// Removes the assignment of `role_id` from `user_id`.
    ///
    /// The pair is addressed by query parameters; the service answers 404
    /// when no such assignment exists.
    pub async fn remove(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::delete("/user-roles").with_query(vec![
                    ("user_id", user_id.to_string()),
                    ("role_id", role_id.to_string()),
                ]),
                invalidation_set(),
            )
            .await
    }
}

fn list_tags(assignments: &Vec<UserRole>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = assignments
        .iter()
        .map(|assignment| Tag::id(ResourceKind::UserRole, assignment.id))
        .collect();
    tags.push(Tag::list(ResourceKind::UserRole));
    tags
}

fn invalidation_set() -> Vec<Tag> {
    vec![
        Tag::list(ResourceKind::UserRole),
        Tag::list(ResourceKind::User),
        Tag::list(ResourceKind::Role),
    ]
}

pub(crate) fn render_filter(query: &[(&'static str, String)]) -> Option<String> {
    if query.is_empty() {
        return None;
    }

    let rendered = query
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    Some(rendered)
}
