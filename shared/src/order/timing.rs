//! Order timing estimator
//!
//! Pure computation of elapsed / remaining / overdue from timestamps. Owns no
//! timer: board views re-evaluate it on every display tick.

use super::{Order, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whole minutes in `to − from`, floored (negative spans round down)
fn floor_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MILLIS_PER_MINUTE)
}

/// Timing snapshot of one order at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTiming {
    pub elapsed_minutes: i64,
    /// Absent when the order carries no completion estimate
    pub estimated_remaining_minutes: Option<i64>,
    pub is_overdue: bool,
}

impl OrderTiming {
    pub fn compute(
        created_at: DateTime<Utc>,
        estimated_completion_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let elapsed_minutes = floor_minutes(created_at, now);
        let estimated_remaining_minutes = estimated_completion_time.map(|eta| floor_minutes(now, eta));
        Self {
            elapsed_minutes,
            estimated_remaining_minutes,
            is_overdue: estimated_remaining_minutes.is_some_and(|m| m < 0),
        }
    }
}

impl OrderTiming {
    /// Elapsed time as shown on the boards, e.g. `17 min fa`, `1h 5min fa`
    pub fn elapsed_label(&self) -> String {
        let minutes = self.elapsed_minutes.max(0);
        if minutes < 60 {
            format!("{} min fa", minutes)
        } else {
            format!("{}h {}min fa", minutes / 60, minutes % 60)
        }
    }
}

impl Order {
    pub fn timing(&self, now: DateTime<Utc>) -> OrderTiming {
        OrderTiming::compute(self.created_at, self.estimated_completion_time, now)
    }

    /// Board helper: terminal orders are never reported overdue
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.status, self.created_at, self.estimated_completion_time, now)
    }
}

/// Overdue check that never flags delivered or cancelled orders
pub fn is_overdue(
    status: OrderStatus,
    created_at: DateTime<Utc>,
    estimated_completion_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    !status.is_terminal() && OrderTiming::compute(created_at, estimated_completion_time, now).is_overdue
}
