//! Order entities as returned by the order service

use super::OrderStatus;
use crate::util::time::{lenient, lenient_option};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Type
// ============================================================================

/// How the order is served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine_in",
            Self::Takeout => "takeout",
            Self::Delivery => "delivery",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DineIn => "Al Tavolo",
            Self::Takeout => "Da Asporto",
            Self::Delivery => "Consegna",
        }
    }
}

// ============================================================================
// Order Item
// ============================================================================

/// Per-item kitchen status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

/// Line of a persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    /// Name cached at submission time
    pub menu_item_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub status: OrderItemStatus,
}

// ============================================================================
// Order
// ============================================================================

/// Persisted order
///
/// Created by submission and afterwards mutated only through status
/// transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Unknown wire statuses fail decoding; list endpoints skip such rows
    pub status: OrderStatus,
    #[serde(with = "lenient")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "lenient_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_option")]
    pub estimated_completion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}

impl Order {
    /// Total number of portions across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Display name for the table, e.g. `Tavolo 5`
    pub fn table_label(&self) -> String {
        match self.table_number {
            Some(n) => format!("Tavolo {}", n),
            None => self.order_type.label().to_string(),
        }
    }
}
