//! Order status state machine
//!
//! ```text
//! confirmed ──► preparing ──► ready ──► delivered
//!     │             │
//!     └─────────────┴──► cancelled
//! ```
//!
//! `confirmed` is the initial status assigned by the service. `delivered`
//! and `cancelled` are terminal. The service may still report the legacy
//! wire values `pending` (read as confirmed) and `payed` (read as delivered).

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canonical order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[serde(alias = "pending")]
    Confirmed,
    Preparing,
    Ready,
    #[serde(alias = "payed")]
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses covered by the synthetic `active` filter
    pub const ACTIVE: [OrderStatus; 3] = [Self::Confirmed, Self::Preparing, Self::Ready];

    /// Status assigned to a freshly submitted order
    pub const INITIAL: OrderStatus = Self::Confirmed;

    /// Legal next statuses
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Ready, Self::Cancelled],
            Self::Ready => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    pub fn can_transition(&self, to: OrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Fails with `InvalidTransition` when `to` is not reachable from `self`
    pub fn validate_transition(&self, to: OrderStatus) -> AppResult<()> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(AppError::invalid_transition(self.as_str(), to.as_str()))
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confermato",
            Self::Preparing => "In Preparazione",
            Self::Ready => "Pronto",
            Self::Delivered => "Pagato",
            Self::Cancelled => "Annullato",
        }
    }

    /// Label for a raw wire value; unknown values are shown as-is
    pub fn label_for(raw: &str) -> String {
        raw.parse::<OrderStatus>()
            .map(|s| s.label().to_string())
            .unwrap_or_else(|_| raw.to_string())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" | "pending" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivered" | "payed" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::validation(format!("Unknown order status: {}", other))
                .with_detail("status", other)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
