//! Shared types for the ByteRisto order engine
//!
//! Domain types and pure logic used by the client crate: menu and order
//! models, the order status state machine, the draft order builder, the
//! timing estimator, roles and views, money helpers, the response envelope
//! and the unified error system.

pub mod error;
pub mod models;
pub mod money;
pub mod order;
pub mod response;
pub mod role;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use response::ApiResponse;
pub use role::{Role, View};
pub use serde::{Deserialize, Serialize};
