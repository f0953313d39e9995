//! Authentication wire types.
//!
//! Register and login answer with the full credential set; refresh answers
//! with a new access token and only sometimes a new refresh token, so the
//! client keeps its current refresh token when the response omits one.

use serde::{Deserialize, Serialize};

use crate::types::User;

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login name for the new account.
    pub username: String,
    /// Email address for the new account.
    pub email: String,
    /// Initial password.
    pub password: String,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Credential set returned by register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// The authenticated account.
    pub user: User,
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

/// Payload for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

/// Payload returned by `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshedTokens {
    /// Replacement bearer token.
    pub access_token: String,
    /// Replacement refresh token, when the service rotates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Payload for `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email of the account to reset.
    pub email: String,
}

/// Payload for `POST /auth/reset-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Reset token from the emailed link.
    pub reset_token: String,
    /// Replacement password.
    pub new_password: String,
}

/// Body of `GET /auth/reset-password/{token}`.
///
/// This endpoint puts its fields next to `status` instead of inside `data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetLinkCheck {
    /// Validity message for the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Frontend URL the emailed link should open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}
