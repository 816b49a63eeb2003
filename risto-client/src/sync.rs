//! Realtime view synchronizer
//!
//! One [`ViewSynchronizer`] per board view. There is no push channel: each
//! board polls `list_orders(filter)` on its own interval and replaces its
//! order set atomically.
//!
//! # Ordering
//!
//! Every refresh takes a sequence number and the current activation epoch
//! when it is issued. A response is applied only if no later-issued refresh
//! has been applied already and the view has not been stopped or restarted
//! since, so a slow poll can never overwrite fresher data and a result from
//! an earlier visit never shows up after the view is reopened.
//!
//! # Lifecycle
//!
//! ```text
//! start() ──► immediate refresh ──► recurrence every `interval`
//!                                    (only while auto-refresh is on)
//! stop()  ──► recurrence cancelled, in-flight results discarded
//! ```

use crate::actions::OrderActions;
use crate::repository::OrderRepository;
use crate::{ClientConfig, ClientError, ClientResult};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use shared::order::board::{BoardSummary, KitchenPreset, PresetCount, preset_counts};
use shared::order::{Order, OrderFilter, OrderStatus, PaymentReceipt, PaymentRequest};
use shared::role::{Role, View};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Board kinds
// ============================================================================

/// Views backed by a polling synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Kitchen,
    ActiveOrders,
    Payments,
}

impl BoardKind {
    pub const ALL: [BoardKind; 3] = [Self::Kitchen, Self::ActiveOrders, Self::Payments];

    pub fn view(&self) -> View {
        match self {
            Self::Kitchen => View::Kitchen,
            Self::ActiveOrders => View::ActiveOrders,
            Self::Payments => View::Payments,
        }
    }

    pub fn from_view(view: View) -> Option<Self> {
        match view {
            View::Kitchen => Some(Self::Kitchen),
            View::ActiveOrders => Some(Self::ActiveOrders),
            View::Payments => Some(Self::Payments),
            View::Menu | View::MenuManagement | View::OrderTaking => None,
        }
    }

    /// Poll interval from configuration
    pub fn interval(&self, config: &ClientConfig) -> Duration {
        let secs = match self {
            Self::Kitchen => config.kitchen_refresh_secs,
            Self::ActiveOrders => config.active_orders_refresh_secs,
            Self::Payments => config.payments_refresh_secs,
        };
        Duration::from_secs(secs)
    }

    /// Server-side filter the board starts with
    ///
    /// The kitchen fetches everything and narrows locally through presets.
    pub fn default_filter(&self) -> OrderFilter {
        match self {
            Self::Kitchen => OrderFilter::default(),
            Self::ActiveOrders => OrderFilter::active(),
            Self::Payments => OrderFilter::default().with_status(OrderStatus::Ready),
        }
    }
}

impl std::fmt::Display for BoardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.view().as_str())
    }
}

// ============================================================================
// State
// ============================================================================

/// Outcome of one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the order set
    Applied { count: usize },
    /// A later-issued refresh was already applied
    Stale,
    /// The view was stopped, or stopped and reopened, while the request was in flight
    Inactive,
}

#[derive(Debug, Default)]
struct BoardState {
    orders: Vec<Order>,
    /// Sequence number of the last applied refresh
    applied_seq: u64,
    last_error: Option<ClientError>,
    loaded: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Read-only copy of a board for rendering
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub kind: BoardKind,
    pub orders: Vec<Order>,
    pub filter: OrderFilter,
    pub loaded: bool,
    pub active: bool,
    pub auto_refresh: bool,
    pub last_error: Option<ClientError>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

struct SyncShared<R> {
    kind: BoardKind,
    actions: OrderActions<R>,
    filter: Mutex<OrderFilter>,
    state: Mutex<BoardState>,
    issued: AtomicU64,
    /// Bumped on every start and stop
    epoch: AtomicU64,
    active: AtomicBool,
    auto_refresh: AtomicBool,
}

impl<R: OrderRepository> SyncShared<R> {
    async fn refresh(&self) -> ClientResult<RefreshOutcome> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let filter = self.filter.lock().clone();
        let result = self.actions.repo().list_orders(&filter).await;

        let mut state = self.state.lock();
        if !self.active.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(board = %self.kind, seq, epoch, "Discarding refresh issued for another activation");
            return Ok(RefreshOutcome::Inactive);
        }
        if seq <= state.applied_seq {
            tracing::debug!(board = %self.kind, seq, applied = state.applied_seq, "Discarding stale refresh");
            return Ok(RefreshOutcome::Stale);
        }
        state.applied_seq = seq;

        match result {
            Ok(orders) => {
                let count = orders.len();
                state.orders = orders;
                state.loaded = true;
                state.last_error = None;
                state.refreshed_at = Some(Utc::now());
                tracing::trace!(board = %self.kind, seq, count, "Board refreshed");
                Ok(RefreshOutcome::Applied { count })
            }
            Err(e) => {
                // Keep the previous order set on screen
                tracing::warn!(board = %self.kind, seq, error = %e, "Board refresh failed");
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}

// ============================================================================
// Synchronizer
// ============================================================================

pub struct ViewSynchronizer<R> {
    shared: Arc<SyncShared<R>>,
    interval: Duration,
    recurrence: Mutex<Option<CancellationToken>>,
}

impl<R: OrderRepository> ViewSynchronizer<R> {
    pub fn new(repo: Arc<R>, kind: BoardKind, interval: Duration) -> Self {
        Self {
            shared: Arc::new(SyncShared {
                kind,
                actions: OrderActions::new(repo),
                filter: Mutex::new(kind.default_filter()),
                state: Mutex::new(BoardState::default()),
                issued: AtomicU64::new(0),
                epoch: AtomicU64::new(0),
                active: AtomicBool::new(false),
                auto_refresh: AtomicBool::new(true),
            }),
            interval,
            recurrence: Mutex::new(None),
        }
    }

    pub fn from_config(repo: Arc<R>, kind: BoardKind, config: &ClientConfig) -> Self {
        Self::new(repo, kind, kind.interval(config))
    }

    pub fn kind(&self) -> BoardKind {
        self.shared.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    pub fn auto_refresh(&self) -> bool {
        self.shared.auto_refresh.load(Ordering::SeqCst)
    }

    /// Whether a recurrence is currently scheduled
    pub fn is_polling(&self) -> bool {
        self.recurrence
            .lock()
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Activate the view: load immediately, then poll while auto-refresh is on
    pub async fn start(&self) -> ClientResult<RefreshOutcome> {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.active.store(true, Ordering::SeqCst);
        if self.auto_refresh() {
            self.schedule();
        }
        tracing::info!(board = %self.kind(), interval_secs = self.interval.as_secs(), "Board started");
        self.shared.refresh().await
    }

    /// Deactivate the view and cancel the recurrence
    pub fn stop(&self) {
        let was_active = self.shared.active.swap(false, Ordering::SeqCst);
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.cancel_recurrence();
        if was_active {
            tracing::info!(board = %self.kind(), "Board stopped");
        }
    }

    /// Start or stop the recurrence without an immediate load
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.shared.auto_refresh.store(enabled, Ordering::SeqCst);
        if !self.is_active() {
            return;
        }
        if enabled {
            self.schedule();
        } else {
            self.cancel_recurrence();
        }
        tracing::debug!(board = %self.kind(), enabled, "Auto-refresh toggled");
    }

    fn schedule(&self) {
        let mut slot = self.recurrence.lock();
        if slot.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return;
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let shared = self.shared.clone();
        let period = self.interval;
        let kind = self.kind();
        let task = async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // Failures are recorded in the board state
                        let _ = shared.refresh().await;
                    }
                }
            }
        };
        tokio::spawn(async move {
            if AssertUnwindSafe(task).catch_unwind().await.is_err() {
                tracing::error!(board = %kind, "Board recurrence panicked");
            }
        });
    }

    fn cancel_recurrence(&self) {
        if let Some(token) = self.recurrence.lock().take() {
            token.cancel();
        }
    }

    // ========================================================================
    // Refresh and filters
    // ========================================================================

    /// Reload now; discarded if superseded or the view is inactive
    pub async fn refresh(&self) -> ClientResult<RefreshOutcome> {
        self.shared.refresh().await
    }

    pub fn filter(&self) -> OrderFilter {
        self.shared.filter.lock().clone()
    }

    /// Replace the server-side filter and reload when active
    pub async fn set_filter(&self, filter: OrderFilter) -> ClientResult<RefreshOutcome> {
        *self.shared.filter.lock() = filter;
        if self.is_active() {
            self.shared.refresh().await
        } else {
            Ok(RefreshOutcome::Inactive)
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Request a status change for an order shown on this board
    ///
    /// The local guard runs first. After the request the board reloads: on
    /// success to pick up the new state, on a server rejection to resync
    /// with whatever the server holds.
    pub async fn transition(&self, role: Role, order_id: &str, to: OrderStatus) -> ClientResult<Order> {
        let order = self.find(order_id)?;
        let result = self
            .shared
            .actions
            .request_transition(role, self.kind().view(), &order, to)
            .await;
        self.reconcile(&result).await;
        result
    }

    /// Take payment for an order shown on this board
    pub async fn pay(
        &self,
        role: Role,
        order_id: &str,
        payment: &PaymentRequest,
    ) -> ClientResult<PaymentReceipt> {
        let order = self.find(order_id)?;
        let result = self.shared.actions.pay_order(role, &order, payment).await;
        self.reconcile(&result).await;
        result
    }

    async fn reconcile<T>(&self, result: &ClientResult<T>) {
        let needs_refresh = match result {
            Ok(_) => true,
            Err(e) => e.is_server_rejection(),
        };
        if !needs_refresh || !self.is_active() {
            return;
        }
        if let Err(e) = result {
            tracing::info!(board = %self.kind(), error = %e, "Server rejected request, resyncing board");
        }
        let _ = self.shared.refresh().await;
    }

    fn find(&self, order_id: &str) -> ClientResult<Order> {
        self.shared
            .state
            .lock()
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| {
                ClientError::from(
                    AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id),
                )
            })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn orders(&self) -> Vec<Order> {
        self.shared.state.lock().orders.clone()
    }

    pub fn last_error(&self) -> Option<ClientError> {
        self.shared.state.lock().last_error.clone()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.shared.state.lock();
        BoardSnapshot {
            kind: self.kind(),
            orders: state.orders.clone(),
            filter: self.filter(),
            loaded: state.loaded,
            active: self.is_active(),
            auto_refresh: self.auto_refresh(),
            last_error: state.last_error.clone(),
            refreshed_at: state.refreshed_at,
        }
    }

    /// Orders visible under a kitchen preset
    pub fn preset_orders(&self, preset: KitchenPreset, now: DateTime<Utc>) -> Vec<Order> {
        let state = self.shared.state.lock();
        preset.apply(&state.orders, now).into_iter().cloned().collect()
    }

    pub fn preset_counts(&self, now: DateTime<Utc>) -> Vec<PresetCount> {
        preset_counts(&self.shared.state.lock().orders, now)
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary::from_orders(&self.shared.state.lock().orders)
    }

    /// Ids of non-terminal orders past their completion estimate
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<String> {
        self.shared
            .state
            .lock()
            .orders
            .iter()
            .filter(|o| o.is_overdue(now))
            .map(|o| o.id.clone())
            .collect()
    }
}

impl<R> Drop for ViewSynchronizer<R> {
    fn drop(&mut self) {
        self.shared.active.store(false, Ordering::SeqCst);
        if let Some(token) = self.recurrence.lock().take() {
            token.cancel();
        }
    }
}
