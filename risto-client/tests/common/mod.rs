// risto-client/tests/common/mod.rs
// Test doubles: an in-memory repository and an HTTP fake of both services
#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use risto_client::{ClientConfig, ClientError, ClientResult, MenuRepository, OrderRepository, RistoClient};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::models::{MenuCategory, MenuFilter, MenuItem, MenuItemCreate, MenuItemUpdate, NutritionalInfo};
use shared::order::{CreateOrderRequest, Order, OrderFilter, OrderItem, OrderStatus, OrderType};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 19, 0, 0).unwrap()
}

pub fn menu_item(id: &str, name: &str, price: &str, available: bool) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        category: MenuCategory::Main,
        price: dec(price),
        preparation_time: 12,
        is_available: available,
        allergens: vec![],
        nutritional_info: NutritionalInfo::default(),
    }
}

pub fn order(id: &str, table: u32, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        order_number: format!("ORD-{}", id),
        table_number: Some(table),
        customer_name: None,
        order_type: OrderType::DineIn,
        items: vec![OrderItem {
            id: format!("{}-1", id),
            menu_item_id: "m-margherita".into(),
            menu_item_name: "Pizza Margherita".into(),
            quantity: 2,
            unit_price: dec("8.50"),
            total_price: dec("17.00"),
            special_instructions: None,
            status: Default::default(),
        }],
        status,
        created_at: fixed_time(),
        updated_at: None,
        estimated_completion_time: None,
        special_instructions: None,
        total_amount: dec("17.00"),
        tax_amount: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        final_amount: dec("17.00"),
    }
}

// ============================================================================
// In-memory repository
// ============================================================================

/// Scripted behaviour for one `list_orders` call
#[derive(Debug, Default)]
struct Step {
    delay: Duration,
    fail: Option<ClientError>,
}

#[derive(Default)]
pub struct FakeRepo {
    orders: Mutex<Vec<Order>>,
    menu: Mutex<Vec<MenuItem>>,
    script: Mutex<VecDeque<Step>>,
    status_rejection: Mutex<Option<ClientError>>,
    menu_gate: Mutex<Option<oneshot::Receiver<Option<ClientError>>>>,
    pub list_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub menu_update_calls: AtomicUsize,
}

impl FakeRepo {
    pub fn with_orders(orders: Vec<Order>) -> Arc<Self> {
        let repo = Self::default();
        *repo.orders.lock() = orders;
        Arc::new(repo)
    }

    pub fn with_menu(menu: Vec<MenuItem>) -> Arc<Self> {
        let repo = Self::default();
        *repo.menu.lock() = menu;
        Arc::new(repo)
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock() = orders;
    }

    /// Change an order behind the client's back
    pub fn set_status(&self, id: &str, status: OrderStatus) {
        if let Some(o) = self.orders.lock().iter_mut().find(|o| o.id == id) {
            o.status = status;
        }
    }

    pub fn push_delay(&self, delay: Duration) {
        self.script.lock().push_back(Step { delay, fail: None });
    }

    pub fn push_failure(&self, error: ClientError) {
        self.script.lock().push_back(Step {
            delay: Duration::ZERO,
            fail: Some(error),
        });
    }

    pub fn reject_next_status_update(&self, error: ClientError) {
        *self.status_rejection.lock() = Some(error);
    }

    /// Hold the next menu update until the sender answers
    pub fn gate_menu_update(&self) -> oneshot::Sender<Option<ClientError>> {
        let (tx, rx) = oneshot::channel();
        *self.menu_gate.lock() = Some(rx);
        tx
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn status_updates(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn stored_menu_item(&self, id: &str) -> Option<MenuItem> {
        self.menu.lock().iter().find(|m| m.id == id).cloned()
    }
}

#[async_trait]
impl OrderRepository for FakeRepo {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().pop_front().unwrap_or_default();
        // The response reflects the data at the time the request was issued
        let snapshot: Vec<Order> = self
            .orders
            .lock()
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        match step.fail {
            Some(e) => Err(e),
            None => Ok(snapshot),
        }
    }

    async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.orders
            .lock()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| ClientError::api(Some(404), "Order not found"))
    }

    async fn submit_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let total: Decimal = request.items.iter().map(|i| i.total_price).sum();
        let mut created = order(&format!("new-{}", n), request.table_number, OrderStatus::Confirmed);
        created.items = request
            .items
            .iter()
            .enumerate()
            .map(|(idx, i)| OrderItem {
                id: format!("new-{}-{}", n, idx),
                menu_item_id: i.menu_item_id.clone(),
                menu_item_name: i.menu_item_name.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
                total_price: i.total_price,
                special_instructions: i.special_instructions.clone(),
                status: Default::default(),
            })
            .collect();
        created.total_amount = total;
        created.final_amount = total;
        self.orders.lock().push(created.clone());
        Ok(created)
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.status_rejection.lock().take() {
            return Err(e);
        }
        let mut orders = self.orders.lock();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ClientError::api(Some(404), "Order not found"))?;
        if !order.status.can_transition(status) {
            return Err(ClientError::api(
                Some(400),
                format!("Cannot change status from {} to {}", order.status, status),
            ));
        }
        order.status = status;
        Ok(order.clone())
    }

    async fn list_kitchen_orders(&self) -> ClientResult<Vec<Order>> {
        self.list_orders(&OrderFilter::active()).await
    }
}

#[async_trait]
impl MenuRepository for FakeRepo {
    async fn list_menu(&self, filter: &MenuFilter) -> ClientResult<Vec<MenuItem>> {
        Ok(self
            .menu
            .lock()
            .iter()
            .filter(|m| filter.available.is_none_or(|a| m.is_available == a))
            .filter(|m| filter.category.is_none_or(|c| m.category == c))
            .cloned()
            .collect())
    }

    async fn list_available_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.list_menu(&MenuFilter::available_only()).await
    }

    async fn get_menu_item(&self, id: &str) -> ClientResult<MenuItem> {
        self.stored_menu_item(id)
            .ok_or_else(|| ClientError::api(Some(404), "Menu item not found"))
    }

    async fn create_menu_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        let created = MenuItem {
            id: format!("m-{}", self.menu.lock().len() + 1),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category,
            price: item.price,
            preparation_time: item.preparation_time,
            is_available: item.is_available.unwrap_or(true),
            allergens: item.allergens.clone(),
            nutritional_info: item.nutritional_info.clone().unwrap_or_default(),
        };
        self.menu.lock().push(created.clone());
        Ok(created)
    }

    async fn update_menu_item(&self, id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem> {
        self.menu_update_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.menu_gate.lock().take();
        if let Some(gate) = gate
            && let Ok(Some(e)) = gate.await
        {
            return Err(e);
        }
        let mut menu = self.menu.lock();
        let item = menu
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ClientError::api(Some(404), "Menu item not found"))?;
        if let Some(available) = update.is_available {
            item.is_available = available;
        }
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: &str) -> ClientResult<()> {
        self.menu.lock().retain(|m| m.id != id);
        Ok(())
    }
}

// ============================================================================
// HTTP fake of the order and menu services
// ============================================================================

#[derive(Default)]
struct ServiceState {
    orders: Vec<Value>,
    menu: Vec<Value>,
    requests: Vec<String>,
    fail_menu_updates: bool,
}

type SharedState = Arc<Mutex<ServiceState>>;

pub struct FakeService {
    pub base_url: String,
    state: SharedState,
}

impl FakeService {
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ServiceState {
            menu: default_menu(),
            ..Default::default()
        }));
        let app = Router::new()
            .route("/api/orders", get(list_orders).post(create_order))
            .route("/api/orders/kitchen", get(kitchen_orders))
            .route("/api/orders/{id}", get(get_order))
            .route("/api/orders/{id}/status", put(update_status))
            .route("/api/menu", get(list_menu))
            .route("/api/menu/available", get(available_menu))
            .route("/api/menu/{id}", get(get_menu_item).put(update_menu_item))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).with_timeout(5)
    }

    pub fn client(&self) -> Arc<RistoClient> {
        Arc::new(RistoClient::new(&self.config()).unwrap())
    }

    /// Requests seen so far, as `METHOD /path[?query]`
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }

    /// Seed an order for table `table` and return its id
    pub fn insert_order(&self, table: u32, status: &str) -> String {
        let mut st = self.state.lock();
        let id = uuid::Uuid::new_v4().to_string();
        let number = st.orders.len() + 1;
        st.orders.push(json!({
            "id": id,
            "order_number": format!("ORD-{:04}", number),
            "table_number": table,
            "order_type": "dine_in",
            "items": [{
                "id": uuid::Uuid::new_v4().to_string(),
                "menu_item_id": "m-margherita",
                "menu_item_name": "Pizza Margherita",
                "quantity": 2,
                "unit_price": 8.5,
                "total_price": 17.0,
                "status": "pending"
            }],
            "status": status,
            "created_at": Utc::now().to_rfc3339(),
            "total_amount": 17.0,
            "tax_amount": 0.0,
            "discount_amount": 0.0,
            "final_amount": 17.0
        }));
        id
    }

    /// Change an order without going through the client
    pub fn set_status(&self, id: &str, status: &str) {
        if let Some(o) = self.state.lock().orders.iter_mut().find(|o| o["id"] == id) {
            o["status"] = json!(status);
        }
    }

    pub fn fail_menu_updates(&self) {
        self.state.lock().fail_menu_updates = true;
    }
}

fn default_menu() -> Vec<Value> {
    vec![
        json!({"id": "m-margherita", "name": "Pizza Margherita", "category": "main",
               "price": 8.5, "preparation_time": 12, "is_available": true,
               "allergens": ["glutine", "lattosio"], "nutritional_info": {"calories": 800}}),
        json!({"id": "m-lasagna", "name": "Lasagna", "category": "main",
               "price": "12.00", "preparation_time": 20, "is_available": true,
               "nutritional_info": null}),
        json!({"id": "m-tiramisu", "name": "Tiramisù", "category": "dessert",
               "price": 6.0, "preparation_time": 5, "is_available": false}),
    ]
}

fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"success": true, "data": data})))
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"success": false, "message": message})))
}

fn parse_query(raw: &Option<String>) -> HashMap<String, String> {
    raw.as_deref()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn record(st: &mut ServiceState, method: &str, path: &str, query: &Option<String>) {
    let line = match query.as_deref() {
        Some(q) if !q.is_empty() => format!("{} {}?{}", method, path, q),
        _ => format!("{} {}", method, path),
    };
    st.requests.push(line);
}

fn status_of(order: &Value) -> Option<OrderStatus> {
    order["status"].as_str().and_then(|s| s.parse().ok())
}

async fn list_orders(State(state): State<SharedState>, RawQuery(query): RawQuery) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", "/orders", &query);
    let params = parse_query(&query);
    let orders: Vec<Value> = st
        .orders
        .iter()
        .filter(|o| match params.get("status").map(String::as_str) {
            None => true,
            Some("active") => status_of(o).is_some_and(|s| s.is_active()),
            Some(s) => o["status"] == s,
        })
        .filter(|o| {
            params
                .get("table_number")
                .is_none_or(|t| o["table_number"].to_string() == *t)
        })
        .cloned()
        .collect();
    let count = orders.len();
    (
        StatusCode::OK,
        Json(json!({"success": true, "data": orders, "count": count})),
    )
}

async fn kitchen_orders(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", "/orders/kitchen", &None);
    let orders: Vec<Value> = st
        .orders
        .iter()
        .filter(|o| matches!(status_of(o), Some(OrderStatus::Confirmed | OrderStatus::Preparing)))
        .cloned()
        .collect();
    ok(json!(orders))
}

async fn get_order(State(state): State<SharedState>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", &format!("/orders/{}", id), &None);
    match st.orders.iter().find(|o| o["id"] == id.as_str()) {
        Some(o) => ok(o.clone()),
        None => fail(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn create_order(State(state): State<SharedState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "POST", "/orders", &None);
    let items = body["items"].as_array().cloned().unwrap_or_default();
    if items.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Order must contain at least one item");
    }
    let total: f64 = items.iter().filter_map(|i| i["total_price"].as_f64()).sum();
    let prep = items
        .iter()
        .filter_map(|i| i["preparation_time"].as_i64())
        .max()
        .unwrap_or(10);
    let now = Utc::now();
    let order = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "order_number": format!("ORD-{:04}", st.orders.len() + 1),
        "table_number": body["table_number"],
        "customer_name": body["customer_name"],
        "order_type": body["order_type"],
        "items": items.iter().map(|i| json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "menu_item_id": i["menu_item_id"],
            "menu_item_name": i["menu_item_name"],
            "quantity": i["quantity"],
            "unit_price": i["unit_price"],
            "total_price": i["total_price"],
            "special_instructions": i["special_instructions"],
            "status": "pending"
        })).collect::<Vec<_>>(),
        "status": "confirmed",
        "created_at": now.to_rfc3339(),
        "updated_at": now.to_rfc3339(),
        "estimated_completion_time": (now + chrono::Duration::minutes(prep + 5)).to_rfc3339(),
        "special_instructions": body["special_instructions"],
        "total_amount": total,
        "tax_amount": 0.0,
        "discount_amount": 0.0,
        "final_amount": total
    });
    st.orders.push(order.clone());
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": order, "message": "Order created successfully"})),
    )
}

async fn update_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "PUT", &format!("/orders/{}/status", id), &None);
    let Some(to) = body["status"].as_str().and_then(|s| s.parse::<OrderStatus>().ok()) else {
        return fail(StatusCode::BAD_REQUEST, "Invalid status");
    };
    let Some(order) = st.orders.iter_mut().find(|o| o["id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    let Some(from) = status_of(order) else {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Corrupt order");
    };
    if !from.can_transition(to) {
        return fail(
            StatusCode::BAD_REQUEST,
            &format!("Cannot change status from {} to {}", from, to),
        );
    }
    order["status"] = json!(to.as_str());
    order["updated_at"] = json!(Utc::now().to_rfc3339());
    ok(order.clone())
}

async fn list_menu(State(state): State<SharedState>, RawQuery(query): RawQuery) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", "/menu", &query);
    let params = parse_query(&query);
    let items: Vec<Value> = st
        .menu
        .iter()
        .filter(|m| {
            params
                .get("available")
                .is_none_or(|a| m["is_available"].to_string() == *a)
        })
        .filter(|m| params.get("category").is_none_or(|c| m["category"] == c.as_str()))
        .cloned()
        .collect();
    ok(json!(items))
}

async fn available_menu(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", "/menu/available", &None);
    let items: Vec<Value> = st
        .menu
        .iter()
        .filter(|m| m["is_available"] == true)
        .cloned()
        .collect();
    ok(json!(items))
}

async fn get_menu_item(State(state): State<SharedState>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "GET", &format!("/menu/{}", id), &None);
    match st.menu.iter().find(|m| m["id"] == id.as_str()) {
        Some(m) => ok(m.clone()),
        None => fail(StatusCode::NOT_FOUND, "Menu item not found"),
    }
}

async fn update_menu_item(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut st = state.lock();
    record(&mut st, "PUT", &format!("/menu/{}", id), &None);
    if st.fail_menu_updates {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Error updating menu item");
    }
    let Some(item) = st.menu.iter_mut().find(|m| m["id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Menu item not found");
    };
    if let Some(available) = body["is_available"].as_bool() {
        item["is_available"] = json!(available);
    }
    ok(item.clone())
}
