//! Resource-scoped API surfaces.
//!
//! Each accessor on [`WardenClient`](crate::WardenClient) hands out one of
//! these borrowing handles, e.g. `client.users().list().await`. Queries go
//! through the tag cache; every mutation declares the tags it invalidates
//! so dependent queries refetch on their next use.

use serde::Serialize;
use serde_json::Value;
use warden_core::{Result, WardenError};

mod auth;
mod permissions;
mod role_permissions;
mod roles;
mod tokens;
mod user_roles;
mod users;

pub use auth::AuthApi;
pub use permissions::PermissionsApi;
pub use role_permissions::RolePermissionsApi;
pub use roles::RolesApi;
pub use tokens::TokensApi;
pub use user_roles::UserRolesApi;
pub use users::UsersApi;

/// Encodes a request payload as a JSON body.
pub(crate) fn encode<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|err| WardenError::decode(format!("cannot encode request body: {err}")))
}
