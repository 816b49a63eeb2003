//! Board projections over a fetched order set
//!
//! Applied locally on top of whatever the synchronizer last loaded; none of
//! these trigger a request.

use super::{Order, OrderStatus};
use crate::util::time::business_date;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Kitchen presets
// ============================================================================

/// Kitchen board quick filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenPreset {
    /// Still to cook: confirmed or preparing
    #[default]
    Active,
    Ready,
    /// Created on the current business day
    Today,
    All,
}

impl KitchenPreset {
    pub const ALL: [KitchenPreset; 4] = [Self::Active, Self::Ready, Self::Today, Self::All];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Attivi",
            Self::Ready => "Pronti",
            Self::Today => "Oggi",
            Self::All => "Tutti",
        }
    }

    pub fn matches(&self, order: &Order, now: DateTime<Utc>) -> bool {
        match self {
            Self::Active => matches!(order.status, OrderStatus::Confirmed | OrderStatus::Preparing),
            Self::Ready => order.status == OrderStatus::Ready,
            Self::Today => business_date(order.created_at) == business_date(now),
            Self::All => true,
        }
    }

    /// Orders passing this preset, in fetched order
    pub fn apply<'a>(&self, orders: &'a [Order], now: DateTime<Utc>) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o, now)).collect()
    }
}

/// A preset with the number of orders it would show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCount {
    pub preset: KitchenPreset,
    pub count: usize,
}

pub fn preset_counts(orders: &[Order], now: DateTime<Utc>) -> Vec<PresetCount> {
    KitchenPreset::ALL
        .iter()
        .map(|preset| PresetCount {
            preset: *preset,
            count: orders.iter().filter(|o| preset.matches(o, now)).count(),
        })
        .collect()
}

// ============================================================================
// Active-orders summary
// ============================================================================

/// Per-status counts and table list for the active-orders board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub confirmed: usize,
    pub preparing: usize,
    pub ready: usize,
    pub delivered: usize,
    /// Distinct table numbers, ascending
    pub tables: Vec<u32>,
    /// Σ final_amount over the listed orders
    pub total_sales: Decimal,
}

impl BoardSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Confirmed => summary.confirmed += 1,
                OrderStatus::Preparing => summary.preparing += 1,
                OrderStatus::Ready => summary.ready += 1,
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Cancelled => {}
            }
            summary.total_sales += order.final_amount;
        }
        summary.tables = orders.iter().filter_map(|o| o.table_number).collect();
        summary.tables.sort_unstable();
        summary.tables.dedup();
        summary
    }
}
