// Error types module

use std::fmt;

use crate::catalog::{AccessError, NotFound};
use crate::imaging::ImagingError;

/// Centralized error type for request handling
///
/// Every failure a request can hit ends up here, and `status_code()`
/// decides how it is reported to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed body, missing parameters, conflicting inputs
    BadRequest(String),

    /// API key missing or unknown
    Access(AccessError),

    /// Template, position or design name did not resolve
    NotFound(NotFound),

    /// Loading, decoding, compositing or encoding failed
    Imaging(ImagingError),

    /// Request body over the configured limit
    PayloadTooLarge(usize),

    /// Known path, unsupported method
    MethodNotAllowed(String),

    /// Unknown path
    RouteNotFound(String),

    /// Unexpected failures (worker panics, serialization)
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Access(AccessError::MissingApiKey) => 401,
            Self::Access(AccessError::InvalidApiKey) => 403,
            Self::NotFound(_) => 404,
            // A source that cannot be fetched is reported as missing
            Self::Imaging(ImagingError::Load(_)) => 404,
            // Only inline images are decoded from request data
            Self::Imaging(ImagingError::Decode(_)) => 400,
            Self::Imaging(ImagingError::Encode(_) | ImagingError::Geometry(_)) => 500,
            Self::PayloadTooLarge(_) => 413,
            Self::MethodNotAllowed(_) => 405,
            Self::RouteNotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Access(err) => write!(f, "{}", err),
            Self::NotFound(err) => write!(f, "{}", err),
            Self::Imaging(err) => write!(f, "{}", err),
            Self::PayloadTooLarge(limit) => {
                write!(f, "Request body exceeds the limit of {} bytes", limit)
            }
            Self::MethodNotAllowed(method) => write!(f, "Method {} not allowed", method),
            Self::RouteNotFound(path) => write!(f, "No route for {}", path),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<NotFound> for ServiceError {
    fn from(err: NotFound) -> Self {
        Self::NotFound(err)
    }
}

impl From<ImagingError> for ServiceError {
    fn from(err: ImagingError) -> Self {
        Self::Imaging(err)
    }
}

impl From<AccessError> for ServiceError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}
