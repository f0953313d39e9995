//! Error types for the Warden client stack.
//!
//! This module defines all error types that can occur while talking to a
//! Warden RBAC service, from transport failures up to envelope decoding.

use std::fmt;

/// Errors that can occur during client operations.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// The request never produced an HTTP response (DNS, connect, TLS, I/O).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The request was rejected with HTTP 401 and could not be recovered
    /// by a token refresh.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Message from the response envelope, or the raw body text.
        message: String,
    },

    /// A success response carried a body that does not match the expected
    /// envelope or payload shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// The persistent session store failed to read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The configured base URL is not a valid HTTP URL.
    #[error("Invalid base URL: {message}")]
    InvalidUrl {
        /// Description of why the URL is invalid.
        message: String,
    },
}

impl WardenError {
    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Api` error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// Returns `true` if this error means the caller's credentials are gone
    /// and the session has been (or should be) cleared.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if the request never reached the service.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the service rejected the request (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Unauthorized { .. } => true,
            Self::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns `true` if the service itself failed (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (500..600).contains(status))
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Network,
            Self::Unauthorized { .. } => ErrorCategory::Authentication,
            Self::Api { .. } => ErrorCategory::Api,
            Self::Decode { .. } => ErrorCategory::Data,
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::InvalidUrl { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Categories of client errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport-level failures.
    Network,
    /// Credential/refresh failures.
    Authentication,
    /// Service-reported errors.
    Api,
    /// Payload decoding failures.
    Data,
    /// Session store failures.
    Storage,
    /// Client configuration errors.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Authentication => write!(f, "authentication"),
            Self::Api => write!(f, "api"),
            Self::Data => write!(f, "data"),
            Self::Storage => write!(f, "storage"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Type alias for client operation results.
pub type Result<T> = std::result::Result<T, WardenError>;
