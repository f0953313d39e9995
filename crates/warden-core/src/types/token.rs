//! Token session wire types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An issued token session as served by `GET /tokens/active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Numeric token record id.
    pub id: i64,
    /// JWT id claim of the issued token.
    pub jti: String,
    /// Token class, `"access"` or `"refresh"`.
    pub token_type: String,
    /// When the token was issued.
    #[serde(with = "crate::timestamp::wire")]
    pub issued_at: OffsetDateTime,
    /// When the token expires.
    #[serde(with = "crate::timestamp::wire")]
    pub expires_at: OffsetDateTime,
    /// Client device description captured at issue time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
    /// Client address captured at issue time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Last time the token authenticated a request.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::wire_opt"
    )]
    pub last_used_at: Option<OffsetDateTime>,
}

impl TokenInfo {
    /// Returns `true` if this token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Returns `true` if this is a refresh token session.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.token_type == "refresh"
    }
}
