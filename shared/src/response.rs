//! API Response types
//!
//! The order and menu services wrap every payload in the same envelope:
//!
//! ```json
//! {
//!     "success": true,
//!     "message": "Order created successfully",
//!     "data": { ... }
//! }
//! ```
//!
//! Failures set `success` to `false` and usually carry a `message`, sometimes
//! an additional raw `error` string.

use serde::{Deserialize, Serialize};

/// Message used when a failed envelope carries no explanation
pub const DEFAULT_FAILURE_MESSAGE: &str = "Errore di comunicazione con il server";

/// Unified API response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Whether the service handled the request
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw error string some endpoints attach next to `message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of records for list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Best human-readable explanation of a failed envelope
    pub fn failure_message(&self) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
            .to_string()
    }
}
