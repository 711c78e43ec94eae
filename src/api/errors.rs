use thiserror::Error;

/// Message used when the server gives no usable `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "request failed";

/// Broad category of an [`ApiError`], for callers that branch on the failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Status,
    Validation,
    Decode,
    Storage,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered 401; the session has been expired.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-success status, carrying the server's `detail`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Input rejected before a request was issued.
    #[error("validation error: {0}")]
    Validation(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The session token could not be persisted or cleared.
    #[error("token storage error: {0}")]
    Storage(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Status { .. } => ErrorKind::Status,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status behind the error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
