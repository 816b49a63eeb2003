//! Order lifecycle
//!
//! - [`board`]: kitchen presets and board summaries
//! - [`status`]: canonical statuses and the transition table
//! - [`types`]: persisted orders as returned by the service
//! - [`draft`]: the client-side draft builder
//! - [`timing`]: elapsed / remaining / overdue estimator
//! - [`filter`]: list query filter
//! - [`payment`]: client-side payment metadata

pub mod board;
pub mod draft;
pub mod filter;
pub mod payment;
pub mod status;
pub mod timing;
pub mod types;

// Re-exports
pub use board::{BoardSummary, KitchenPreset, PresetCount};
pub use draft::{CreateOrderItem, CreateOrderRequest, DraftOrder, DraftOrderItem};
pub use filter::{OrderFilter, StatusFilter};
pub use payment::{PaymentMethod, PaymentReceipt, PaymentRequest};
pub use status::OrderStatus;
pub use timing::OrderTiming;
pub use types::{Order, OrderItem, OrderItemStatus, OrderType};
