//! Assignment wire types: user-to-role and role-to-permission links.
//!
//! Assignments have a surrogate `id`, but removal is keyed by the natural
//! pair (`user_id`/`role_id`, `role_id`/`permission_id`) sent as query
//! parameters. The service serializes the bare link; timestamps and embedded
//! entities appear only on some deployments, so they are optional here.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Permission, Role, User};

/// A user-to-role assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRole {
    /// Surrogate assignment id.
    pub id: i64,
    /// The assigned user.
    pub user_id: i64,
    /// The assigned role.
    pub role_id: i64,
    /// When the assignment was created.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::wire_opt"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// When the assignment was last touched.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::wire_opt"
    )]
    pub updated_at: Option<OffsetDateTime>,
    /// Embedded user record, when the service expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Embedded role record, when the service expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// A role-to-permission assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Surrogate assignment id.
    pub id: i64,
    /// The granting role.
    pub role_id: i64,
    /// The granted permission.
    pub permission_id: i64,
    /// When the assignment was created.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::wire_opt"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// When the assignment was last touched.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::wire_opt"
    )]
    pub updated_at: Option<OffsetDateTime>,
    /// Embedded role record, when the service expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Embedded permission record, when the service expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

/// Payload for `POST /user-roles`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// The user receiving the role.
    pub user_id: i64,
    /// The role being assigned.
    pub role_id: i64,
}

/// Payload for `POST /role-permissions`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssignPermissionRequest {
    /// The role receiving the permission.
    pub role_id: i64,
    /// The permission being granted.
    pub permission_id: i64,
}

/// Filter for `GET /user-roles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserRoleFilter {
    /// Restrict to assignments of this user.
    pub user_id: Option<i64>,
    /// Restrict to assignments of this role.
    pub role_id: Option<i64>,
}

impl UserRoleFilter {
    /// Filter by user.
    #[must_use]
    pub fn by_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            role_id: None,
        }
    }

    /// Filter by role.
    #[must_use]
    pub fn by_role(role_id: i64) -> Self {
        Self {
            user_id: None,
            role_id: Some(role_id),
        }
    }

    /// Renders the filter as query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(user_id) = self.user_id {
            query.push(("user_id", user_id.to_string()));
        }
        if let Some(role_id) = self.role_id {
            query.push(("role_id", role_id.to_string()));
        }
        query
    }
}

/// Filter for `GET /role-permissions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolePermissionFilter {
    /// Restrict to assignments of this role.
    pub role_id: Option<i64>,
    /// Restrict to assignments of this permission.
    pub permission_id: Option<i64>,
}

impl RolePermissionFilter {
    /// Filter by role.
    #[must_use]
    pub fn by_role(role_id: i64) -> Self {
        Self {
            role_id: Some(role_id),
            permission_id: None,
        }
    }

    /// Filter by permission.
    #[must_use]
    pub fn by_permission(permission_id: i64) -> Self {
        Self {
            role_id: None,
            permission_id: Some(permission_id),
        }
    }

    /// Renders the filter as query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(role_id) = self.role_id {
            query.push(("role_id", role_id.to_string()));
        }
        if let Some(permission_id) = self.permission_id {
            query.push(("permission_id", permission_id.to_string()));
        }
        query
    }
}
