//! Data models
//!
//! Menu catalog types as served by the menu service. Order types live in
//! [`crate::order`].

pub mod menu_item;

// Re-exports
pub use menu_item::*;
