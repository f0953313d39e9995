pub mod assignments;
pub mod auth;
pub mod permissions;
pub mod roles;
pub mod tokens;
pub mod users;
