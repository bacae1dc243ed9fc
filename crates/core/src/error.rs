//! Error taxonomy shared by the core and the shell
//!
//! Every failure an organizer operation can surface maps to exactly one
//! variant here. Validation errors are produced before any I/O, hierarchy
//! violations after kind resolution, and parse/schema errors only from the
//! normalizers.

use serde::Serialize;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a non-success HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// 401 or 403
    Auth,
    /// 404
    NotFound,
    /// 429
    RateLimited,
    /// Any 5xx
    Server,
    /// Any other 4xx (and anything else that is not 2xx)
    Client,
}

impl StatusClass {
    /// Classify a status code. Returns `None` for 2xx codes.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 | 403 => Some(Self::Auth),
            404 => Some(Self::NotFound),
            429 => Some(Self::RateLimited),
            500..=599 => Some(Self::Server),
            _ => Some(Self::Client),
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Auth => "authentication failed",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limited",
            Self::Server => "server error",
            Self::Client => "request rejected",
        };
        write!(f, "{label}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad identifier or name, detected before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The container could not be resolved against any endpoint
    #[error("Not found: {0}")]
    NotFound(String),

    /// Valid container, wrong kind for the requested operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The payload is not well-formed JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload is JSON but structurally incomplete
    #[error("Schema error: {0}")]
    Schema(String),

    /// Non-success status code from a well-formed request
    #[error("Remote error [{status}] ({class}) while {context}")]
    Remote {
        status: u16,
        class: StatusClass,
        context: String,
    },

    /// Transport-level failure, passed through unchanged
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    /// Build a `Remote` error for a status code, classifying it on the way.
    ///
    /// 2xx codes never reach this function in practice; they are reported as
    /// `Client` so the result is always an error.
    pub fn remote(status: u16, context: impl Into<String>) -> Self {
        Self::Remote {
            status,
            class: StatusClass::from_status(status).unwrap_or(StatusClass::Client),
            context: context.into(),
        }
    }

    /// Short machine-readable name of the variant
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Parse(_) => "parse_error",
            Self::Schema(_) => "schema_error",
            Self::Remote { .. } => "remote_error",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class_success_is_none() {
        assert_eq!(StatusClass::from_status(200), None);
        assert_eq!(StatusClass::from_status(201), None);
        assert_eq!(StatusClass::from_status(204), None);
    }

    #[test]
    fn test_status_class_buckets() {
        assert_eq!(StatusClass::from_status(401), Some(StatusClass::Auth));
        assert_eq!(StatusClass::from_status(403), Some(StatusClass::Auth));
        assert_eq!(StatusClass::from_status(404), Some(StatusClass::NotFound));
        assert_eq!(StatusClass::from_status(429), Some(StatusClass::RateLimited));
        assert_eq!(StatusClass::from_status(503), Some(StatusClass::Server));
        assert_eq!(StatusClass::from_status(400), Some(StatusClass::Client));
        assert_eq!(StatusClass::from_status(302), Some(StatusClass::Client));
    }

    #[test]
    fn test_remote_error_message_carries_status_and_context() {
        let err = Error::remote(409, "creating section in notebook");
        let message = err.to_string();

        assert!(message.contains("409"));
        assert!(message.contains("creating section in notebook"));
        assert_eq!(err.code(), "remote_error");
    }
}
