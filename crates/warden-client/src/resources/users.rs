//! User account endpoints.

use warden_core::{
    CreateUserRequest, ResourceKind, Result, Tag, UpdateUserRequest, User,
};

use crate::WardenClient;
use crate::cache::QueryKey;
use crate::pipeline::ApiRequest;
use crate::resources::encode;

/// `/users` endpoints.
pub struct UsersApi<'a> {
    client: &'a WardenClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Lists all user accounts.
    ///
    /// Cached; tagged with every returned user plus the user list tag, so
    /// both entity updates and creations reach it.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.client
            .query(QueryKey::new("users.list"), ApiRequest::get("/users"), list_tags)
            .await
    }

    /// Fetches one user account.
    pub async fn get(&self, id: i64) -> Result<User> {
        self.client
            .query(
                QueryKey::with_param("users.get", id.to_string()),
                ApiRequest::get(format!("/users/{id}")),
                |user: &User| vec![Tag::id(ResourceKind::User, user.id)],
            )
            .await
    }

    /// Creates a user account.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        self.client
            .mutate(
                ApiRequest::post("/users").with_json(encode(&request)?),
                vec![Tag::list(ResourceKind::User)],
            )
            .await
    }

    /// Updates a user account. Absent fields are left untouched.
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User> {
        self.client
            .mutate(
                ApiRequest::put(format!("/users/{id}")).with_json(encode(&request)?),
                vec![Tag::id(ResourceKind::User, id), Tag::list(ResourceKind::User)],
            )
            .await
    }

    /// Deletes a user account.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .mutate_unit(
                ApiRequest::delete(format!("/users/{id}")),
                vec![Tag::id(ResourceKind::User, id), Tag::list(ResourceKind::User)],
            )
            .await
    }
}

fn list_tags(users: &Vec<User>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = users
        .iter()
        .map(|user| Tag::id(ResourceKind::User, user.id))
        .collect();
    tags.push(Tag::list(ResourceKind::User));
    tags
}
