//! Wire types for the service's REST surface.

mod assignment;
mod auth;
mod permission;
mod role;
mod token;
mod user;

pub use assignment::{
    AssignPermissionRequest, AssignRoleRequest, RolePermission, RolePermissionFilter, UserRole,
    UserRoleFilter,
};
pub use auth::{
    AuthTokens, ForgotPasswordRequest, LoginRequest, RefreshRequest, RefreshedTokens,
    RegisterRequest, ResetLinkCheck, ResetPasswordRequest,
};
pub use permission::{CreatePermissionRequest, Permission, UpdatePermissionRequest};
pub use role::{CreateRoleRequest, Role, UpdateRoleRequest};
pub use token::TokenInfo;
pub use user::{CreateUserRequest, UpdateUserRequest, User};
