//! # warden-client
//!
//! Access layer for a warden RBAC service.
//!
//! This crate provides:
//! - **Session state**: current user and token pair, persisted through a
//!   pluggable [`SessionStore`] and restored on startup
//! - **Authenticated pipeline**: every request carries the bearer token; a
//!   401 triggers one token refresh and one replay before giving up
//! - **Tag-invalidated cache**: query results are cached until a mutation
//!   invalidates their tags, with change notices for subscribers
//! - **Typed resources**: users, roles, permissions, assignments, grants,
//!   and token inventory as `async` methods returning `Result`
//!
//! ## Example
//!
//! ```no_run
//! use warden_client::WardenClient;
//! use warden_core::LoginRequest;
//!
//! # async fn run() -> warden_core::Result<()> {
//! let client = WardenClient::connect("http://localhost:8000/api/v1").await?;
//!
//! client
//!     .auth()
//!     .login(LoginRequest {
//!         email: "admin@example.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//!
//! let users = client.users().list().await?;
//! println!("{} accounts", users.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod client;
mod pipeline;
pub mod resources;
pub mod session;

pub use cache::{CacheNotice, CacheStatsSnapshot, CacheSubscription, QueryKey};
pub use client::{WardenClient, WardenClientBuilder};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionEvent, SessionManager, SessionStore,
};
