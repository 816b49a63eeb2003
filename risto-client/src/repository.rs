//! Service boundary
//!
//! [`OrderRepository`] and [`MenuRepository`] are the only way the
//! coordination layer talks to the outside world. [`RistoClient`] implements
//! both over HTTP; tests substitute in-memory fakes.

use crate::http::NetworkHttpClient;
use crate::{ClientConfig, ClientResult};
use async_trait::async_trait;
use shared::models::{MenuFilter, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::order::{
    CreateOrderRequest, DraftOrder, Order, OrderFilter, OrderStatus, PaymentReceipt, PaymentRequest,
};

// ============================================================================
// Traits
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// `GET /orders`
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>>;

    /// `GET /orders/{id}`
    async fn get_order(&self, id: &str) -> ClientResult<Order>;

    /// `POST /orders` with an already validated body
    async fn submit_order(&self, request: &CreateOrderRequest) -> ClientResult<Order>;

    /// `PUT /orders/{id}/status`; the service re-validates the transition
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order>;

    /// `GET /orders/kitchen`
    async fn list_kitchen_orders(&self) -> ClientResult<Vec<Order>>;

    /// Validate the draft locally, then submit it
    ///
    /// A draft without table or items fails before any request is made.
    async fn create_order(&self, draft: &DraftOrder) -> ClientResult<Order> {
        let request = draft.to_create_request()?;
        let order = self.submit_order(&request).await?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            table = request.table_number,
            "Order submitted"
        );
        Ok(order)
    }

    /// Mark a ready order as paid (`delivered`)
    ///
    /// Method, tendered amount and change stay on the client.
    async fn pay_order(&self, order: &Order, payment: &PaymentRequest) -> ClientResult<PaymentReceipt> {
        payment.validate(order)?;
        let updated = self.update_order_status(&order.id, OrderStatus::Delivered).await?;
        let receipt = PaymentReceipt::new(updated, payment);
        tracing::info!(
            order_id = %receipt.order.id,
            method = ?receipt.method,
            change = %receipt.change,
            "Order paid"
        );
        Ok(receipt)
    }
}

#[async_trait]
pub trait MenuRepository: Send + Sync + 'static {
    /// `GET /menu?category=&available=`
    async fn list_menu(&self, filter: &MenuFilter) -> ClientResult<Vec<MenuItem>>;

    /// `GET /menu/available`
    async fn list_available_menu(&self) -> ClientResult<Vec<MenuItem>>;

    async fn get_menu_item(&self, id: &str) -> ClientResult<MenuItem>;

    async fn create_menu_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem>;

    async fn update_menu_item(&self, id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem>;

    async fn delete_menu_item(&self, id: &str) -> ClientResult<()>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

#[derive(serde::Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

/// HTTP client for the order and menu services
#[derive(Debug, Clone)]
pub struct RistoClient {
    orders: NetworkHttpClient,
    menu: NetworkHttpClient,
}

impl RistoClient {
    /// Build both service clients over one connection pool
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            orders: NetworkHttpClient::with_client(client.clone(), &config.order_service_url),
            menu: NetworkHttpClient::with_client(client, &config.menu_service_url),
        })
    }

    pub fn order_service_url(&self) -> &str {
        self.orders.base_url()
    }

    pub fn menu_service_url(&self) -> &str {
        self.menu.base_url()
    }
}

#[async_trait]
impl OrderRepository for RistoClient {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        self.orders.get_list("orders", &filter.to_query()).await
    }

    async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.orders.get(&format!("orders/{}", id), &[]).await
    }

    async fn submit_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.orders.post("orders", request).await
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        let order: Order = self
            .orders
            .put(&format!("orders/{}/status", id), &StatusUpdate { status })
            .await?;
        tracing::debug!(order_id = %id, status = %order.status, "Order status updated");
        Ok(order)
    }

    async fn list_kitchen_orders(&self) -> ClientResult<Vec<Order>> {
        self.orders.get_list("orders/kitchen", &[]).await
    }
}

#[async_trait]
impl MenuRepository for RistoClient {
    async fn list_menu(&self, filter: &MenuFilter) -> ClientResult<Vec<MenuItem>> {
        self.menu.get_list("menu", &filter.to_query()).await
    }

    async fn list_available_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.menu.get_list("menu/available", &[]).await
    }

    async fn get_menu_item(&self, id: &str) -> ClientResult<MenuItem> {
        self.menu.get(&format!("menu/{}", id), &[]).await
    }

    async fn create_menu_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        self.menu.post("menu", item).await
    }

    async fn update_menu_item(&self, id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem> {
        self.menu.put(&format!("menu/{}", id), update).await
    }

    async fn delete_menu_item(&self, id: &str) -> ClientResult<()> {
        self.menu.delete(&format!("menu/{}", id)).await
    }
}
