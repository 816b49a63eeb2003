//! Risto Client - order lifecycle coordination for ByteRisto
//!
//! Talks to the order and menu services over HTTP and keeps each board view
//! in sync by polling. All rule checks (draft validation, transition guards,
//! role permissions, payment checks) run locally before any request.

pub mod actions;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod menu;
pub mod optimistic;
pub mod repository;
pub mod session;
pub mod sync;

pub use actions::OrderActions;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;
pub use menu::MenuCatalogView;
pub use optimistic::OptimisticUpdate;
pub use repository::{MenuRepository, OrderRepository, RistoClient};
pub use session::Session;
pub use sync::{BoardKind, BoardSnapshot, RefreshOutcome, ViewSynchronizer};

// Re-export shared types for convenience
pub use shared::{ApiResponse, AppError, ErrorCode, Role, View};
