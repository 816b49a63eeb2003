//! Client-side payment metadata
//!
//! Payment is only a status transition trigger (ready → delivered). Method,
//! tendered amount and change are computed locally for the cashier and are
//! never persisted.

use super::{Order, OrderStatus};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::money::{change_due, format_eur};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the customer pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Other,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Contanti",
            Self::Card => "Carta",
            Self::Other => "Altro",
        }
    }
}

/// Cashier input for one payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub method: PaymentMethod,
    /// Amount handed over; `None` means exact amount
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub tendered: Option<Decimal>,
}

impl PaymentRequest {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            tendered: None,
        }
    }

    pub fn with_tendered(mut self, tendered: Decimal) -> Self {
        self.tendered = Some(tendered);
        self
    }

    /// Check the request against an order before anything is sent
    ///
    /// The order must be `ready`, and a tendered amount, when given, must
    /// cover `final_amount`.
    pub fn validate(&self, order: &Order) -> AppResult<()> {
        if order.status != OrderStatus::Ready {
            return Err(AppError::with_message(
                ErrorCode::OrderNotPayable,
                format!(
                    "Order must be ready to be paid. Current status: {}",
                    order.status
                ),
            )
            .with_detail("status", order.status.as_str()));
        }
        if let Some(tendered) = self.tendered {
            if tendered.is_sign_negative() {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    "Payment amount cannot be negative",
                ));
            }
            if tendered < order.final_amount {
                return Err(AppError::with_message(
                    ErrorCode::PaymentInsufficientAmount,
                    format!(
                        "Payment amount ({}) is less than order total ({})",
                        format_eur(tendered),
                        format_eur(order.final_amount)
                    ),
                ));
            }
        }
        Ok(())
    }

    /// `max(0, tendered − final_amount)`; zero for exact payments
    pub fn change_for(&self, final_amount: Decimal) -> Decimal {
        self.tendered
            .map(|t| change_due(t, final_amount))
            .unwrap_or(Decimal::ZERO)
    }
}

/// Result of a completed payment: the delivered order plus local metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order: Order,
    pub method: PaymentMethod,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub tendered: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
}

impl PaymentReceipt {
    pub fn new(order: Order, request: &PaymentRequest) -> Self {
        Self {
            change: request.change_for(order.final_amount),
            method: request.method,
            tendered: request.tendered,
            order,
        }
    }
}
