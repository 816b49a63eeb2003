//! Query filter for `GET /orders`

use super::{Order, OrderStatus, OrderType};
use crate::util::time::business_date;
use chrono::NaiveDate;

/// Status criterion: one status or the synthetic `active` set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    Active,
    Status(OrderStatus),
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Status(s) => s.as_str(),
        }
    }

    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            Self::Active => status.is_active(),
            Self::Status(s) => *s == status,
        }
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        Self::Status(status)
    }
}

/// Order list filter; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<StatusFilter>,
    pub table_number: Option<u32>,
    pub order_type: Option<OrderType>,
    /// Inclusive, business-day calendar date
    pub date_from: Option<NaiveDate>,
    /// Inclusive, business-day calendar date
    pub date_to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl OrderFilter {
    pub fn active() -> Self {
        Self::default().with_status(StatusFilter::Active)
    }

    pub fn with_status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_table(mut self, table_number: u32) -> Self {
        self.table_number = Some(table_number);
        self
    }

    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in a stable order
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(table) = self.table_number {
            query.push(("table_number", table.to_string()));
        }
        if let Some(order_type) = self.order_type {
            query.push(("order_type", order_type.as_str().to_string()));
        }
        if let Some(from) = self.date_from {
            query.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            query.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }

    /// Local evaluation of the filter (`limit` is not applied)
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status
            && !status.matches(order.status)
        {
            return false;
        }
        if self.table_number.is_some() && order.table_number != self.table_number {
            return false;
        }
        if let Some(order_type) = self.order_type
            && order.order_type != order_type
        {
            return false;
        }
        let day = business_date(order.created_at);
        if self.date_from.is_some_and(|from| day < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }
}
