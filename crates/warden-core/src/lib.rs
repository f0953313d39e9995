//! # warden-core
//!
//! Core types for the Warden RBAC administration client.
//!
//! This crate carries everything the client stack shares and nothing that
//! does I/O:
//!
//! - [`types`] - Wire records and request payloads for the REST surface
//! - [`envelope`] - The `{status, message?, data?}` response envelope
//! - [`tag`] - Cache tag vocabulary used for invalidation
//! - [`error`] - The client error taxonomy
//! - [`timestamp`] - Wire timestamp (de)serialization

pub mod envelope;
pub mod error;
pub mod tag;
pub mod timestamp;
pub mod types;

pub use envelope::{Envelope, EnvelopeStatus, decode_data, decode_document, decode_unit};
pub use error::{ErrorCategory, Result, WardenError};
pub use tag::{ResourceKind, Tag, TagKey, tags_intersect};
pub use types::{
    AssignPermissionRequest, AssignRoleRequest, AuthTokens, CreatePermissionRequest,
    CreateRoleRequest, CreateUserRequest, ForgotPasswordRequest, LoginRequest, Permission,
    RefreshRequest, RefreshedTokens, RegisterRequest, ResetLinkCheck, ResetPasswordRequest, Role,
    RolePermission, RolePermissionFilter, TokenInfo, UpdatePermissionRequest, UpdateRoleRequest,
    UpdateUserRequest, User, UserRole, UserRoleFilter,
};
