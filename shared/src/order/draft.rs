//! Draft order builder
//!
//! A `DraftOrder` is the in-progress order on the client before submission.
//! Every operation is a pure transformation: it borrows the current draft and
//! returns the next one, leaving the input untouched.
//!
//! Line totals are recomputed on every mutation, and `total()` is always the
//! sum of the line totals.

use super::OrderType;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::MenuItem;
use crate::money::line_total;
use crate::util::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, normalize_optional, validate_optional_text};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minutes added on top of the slowest item
pub const READY_BUFFER_MINUTES: u32 = 5;

/// Estimate used when no item carries a preparation time
pub const DEFAULT_READY_MINUTES: u32 = 15;

// ============================================================================
// Draft types
// ============================================================================

/// One line of a draft, snapshotting the menu item at add time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
    /// Minutes
    pub preparation_time: u32,
}

impl DraftOrderItem {
    fn from_menu_item(item: &MenuItem) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: 1,
            unit_price: item.price,
            total_price: item.price,
            special_instructions: None,
            preparation_time: item.preparation_time,
        }
    }

    fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self.total_price = line_total(self.unit_price, quantity);
        self
    }
}

/// Order being composed by floor staff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftOrder {
    /// Unset while editing; required for submission
    pub table_number: Option<u32>,
    pub customer_name: Option<String>,
    pub order_type: OrderType,
    /// Insertion order is display order
    pub items: Vec<DraftOrderItem>,
    pub special_instructions: Option<String>,
}

// ============================================================================
// Pure operations
// ============================================================================

impl DraftOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one portion of `item`; an existing line is incremented by one
    #[must_use]
    pub fn add_item(&self, item: &MenuItem) -> Self {
        let mut next = self.clone();
        match next.items.iter().position(|l| l.menu_item_id == item.id) {
            Some(idx) => {
                let line = next.items[idx].clone();
                let quantity = line.quantity.saturating_add(1);
                next.items[idx] = line.with_quantity(quantity);
            }
            None => next.items.push(DraftOrderItem::from_menu_item(item)),
        }
        next
    }

    #[must_use]
    pub fn remove_item(&self, menu_item_id: &str) -> Self {
        let mut next = self.clone();
        next.items.retain(|l| l.menu_item_id != menu_item_id);
        next
    }

    /// Set a line's quantity; zero or less removes the line
    #[must_use]
    pub fn set_quantity(&self, menu_item_id: &str, quantity: i64) -> Self {
        if quantity <= 0 {
            return self.remove_item(menu_item_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut next = self.clone();
        next.items = next
            .items
            .into_iter()
            .map(|l| {
                if l.menu_item_id == menu_item_id {
                    l.with_quantity(quantity)
                } else {
                    l
                }
            })
            .collect();
        next
    }

    #[must_use]
    pub fn set_item_instructions(&self, menu_item_id: &str, instructions: Option<String>) -> Self {
        let mut next = self.clone();
        let instructions = normalize_optional(instructions);
        if let Some(line) = next.items.iter_mut().find(|l| l.menu_item_id == menu_item_id) {
            line.special_instructions = instructions;
        }
        next
    }

    /// `None` or `Some(0)` unsets the table
    #[must_use]
    pub fn set_table_number(&self, table_number: Option<u32>) -> Self {
        Self {
            table_number: table_number.filter(|n| *n > 0),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_customer_name(&self, name: Option<String>) -> Self {
        Self {
            customer_name: normalize_optional(name),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_order_type(&self, order_type: OrderType) -> Self {
        Self {
            order_type,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_order_instructions(&self, instructions: Option<String>) -> Self {
        Self {
            special_instructions: normalize_optional(instructions),
            ..self.clone()
        }
    }

    /// Σ line totals, unrounded
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|l| l.total_price).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Local ready estimate: slowest item plus a fixed buffer
    ///
    /// Lines without a preparation time count as [`DEFAULT_READY_MINUTES`],
    /// as does an empty draft.
    pub fn estimated_ready_minutes(&self) -> u32 {
        self.items
            .iter()
            .map(|l| match l.preparation_time {
                0 => DEFAULT_READY_MINUTES,
                t => t,
            })
            .max()
            .unwrap_or(DEFAULT_READY_MINUTES)
            .saturating_add(READY_BUFFER_MINUTES)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Check the submission preconditions; runs before any network call
    pub fn validate_for_submission(&self) -> AppResult<u32> {
        let table_number = self.table_number.ok_or_else(|| {
            AppError::with_message(ErrorCode::TableNumberRequired, "Inserire il numero del tavolo")
        })?;
        if self.items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                "Aggiungere almeno un piatto all'ordine",
            ));
        }
        validate_optional_text(&self.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
        for line in &self.items {
            validate_optional_text(&line.special_instructions, "item special_instructions", MAX_NOTE_LEN)?;
        }
        Ok(table_number)
    }

    /// Build the `POST /orders` body after validating the draft
    pub fn to_create_request(&self) -> AppResult<CreateOrderRequest> {
        let table_number = self.validate_for_submission()?;
        Ok(CreateOrderRequest {
            table_number,
            customer_name: self.customer_name.clone(),
            order_type: self.order_type,
            special_instructions: self.special_instructions.clone(),
            total_amount: self.total(),
            items: self
                .items
                .iter()
                .map(|l| CreateOrderItem {
                    menu_item_id: l.menu_item_id.clone(),
                    menu_item_name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    total_price: l.total_price,
                    special_instructions: l.special_instructions.clone(),
                    preparation_time: l.preparation_time,
                })
                .collect(),
        })
    }
}

// ============================================================================
// Wire payload
// ============================================================================

/// Body of `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub table_number: u32,
    pub customer_name: Option<String>,
    pub order_type: OrderType,
    pub special_instructions: Option<String>,
    /// Convenience total; the service recomputes it
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
    pub preparation_time: u32,
}
