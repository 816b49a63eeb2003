//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::response::DEFAULT_FAILURE_MESSAGE;
use thiserror::Error;

/// Client error type
///
/// Every boundary failure lands in `Transport`, `InvalidResponse` or `Api`
/// with a human-readable message.
/// Rule violations detected locally stay `Domain` and never reach the wire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Validation, illegal transition or permission failure raised locally
    #[error(transparent)]
    Domain(#[from] AppError),

    /// Network failure
    #[error("{0}")]
    Transport(String),

    /// 2xx body that is not a usable envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service answered with an error
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// An optimistic change was rolled back
    #[error("{message}")]
    OptimisticUpdate { message: String },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Input rejected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_validation())
    }

    /// Client-side transition guard rejection
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::Domain(e) if e.code == ErrorCode::InvalidTransition)
    }

    /// The service refused the request
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(e) => e.code,
            Self::Transport(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) => ErrorCode::InvalidResponse,
            Self::Api { status: Some(404), .. } => ErrorCode::NotFound,
            Self::Api { .. } => ErrorCode::InvalidRequest,
            Self::OptimisticUpdate { .. } => ErrorCode::InvalidRequest,
            Self::Config(_) => ErrorCode::InternalError,
        }
    }

    /// Message suitable for display
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Domain(e) => e.message.as_str(),
            Self::Transport(m) => m.as_str(),
            Self::InvalidResponse(_) => ErrorCode::InvalidResponse.message(),
            Self::Api { message, .. } | Self::OptimisticUpdate { message } => message.as_str(),
            Self::Config(m) => m.as_str(),
        };
        if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message.to_string()
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("Timeout della richiesta al server".into())
        } else if err.is_connect() {
            Self::Transport(DEFAULT_FAILURE_MESSAGE.into())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
