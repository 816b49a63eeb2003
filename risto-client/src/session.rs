//! Per-session coordination
//!
//! A [`Session`] holds the declared role, the current view and all
//! view-local state: the draft being composed, the menu catalog and one
//! synchronizer per board. Only the board of the current view is ever
//! active.

use crate::actions::OrderActions;
use crate::menu::MenuCatalogView;
use crate::repository::{MenuRepository, OrderRepository};
use crate::sync::{BoardKind, RefreshOutcome, ViewSynchronizer};
use crate::{ClientConfig, ClientError, ClientResult};
use shared::error::AppError;
use shared::models::MenuFilter;
use shared::order::{DraftOrder, Order, OrderStatus, PaymentReceipt, PaymentRequest};
use shared::role::{Role, View};
use std::collections::HashMap;
use std::sync::Arc;

pub struct Session<R> {
    repo: Arc<R>,
    config: ClientConfig,
    role: Option<Role>,
    view: Option<View>,
    draft: DraftOrder,
    menu: MenuCatalogView<R>,
    boards: HashMap<BoardKind, ViewSynchronizer<R>>,
}

impl<R> Session<R>
where
    R: OrderRepository + MenuRepository,
{
    pub fn new(repo: Arc<R>, config: ClientConfig) -> Self {
        Self {
            menu: MenuCatalogView::new(repo.clone()),
            repo,
            config,
            role: None,
            view: None,
            draft: DraftOrder::new(),
            boards: HashMap::new(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn view(&self) -> Option<View> {
        self.view
    }

    pub fn permitted_views(&self) -> &'static [View] {
        self.role.map(|r| r.permitted_views()).unwrap_or(&[])
    }

    fn require_role(&self) -> ClientResult<Role> {
        self.role
            .ok_or_else(|| AppError::permission_denied("No role selected").into())
    }

    // ========================================================================
    // Role and navigation
    // ========================================================================

    /// Declare the session role
    ///
    /// Clears every piece of view-local state and opens the role's first
    /// permitted view.
    pub async fn select_role(&mut self, role: Role) -> ClientResult<View> {
        self.clear_view_state();
        self.role = Some(role);
        let view = role.default_view();
        tracing::info!(role = %role, view = %view, "Role selected");
        self.navigate(view).await?;
        Ok(view)
    }

    /// Leave the role selector: back to an empty session
    pub fn clear_role(&mut self) {
        self.clear_view_state();
        self.role = None;
    }

    fn clear_view_state(&mut self) {
        for board in self.boards.values() {
            board.stop();
        }
        self.boards.clear();
        self.draft = DraftOrder::new();
        self.menu.reset();
        self.view = None;
    }

    /// Open `view`, stopping every other board
    ///
    /// A failed initial load does not block navigation; it is kept on the
    /// board as its last error.
    pub async fn navigate(&mut self, view: View) -> ClientResult<()> {
        let role = self.require_role()?;
        role.ensure_can_open(view)?;

        let target = BoardKind::from_view(view);
        for (kind, board) in &self.boards {
            if Some(*kind) != target {
                board.stop();
            }
        }
        self.view = Some(view);
        tracing::debug!(role = %role, view = %view, "Navigated");

        match view {
            View::Menu | View::MenuManagement | View::OrderTaking => {
                // Order taking only lists dishes that can be ordered
                let filter = if view == View::OrderTaking {
                    MenuFilter::available_only()
                } else {
                    MenuFilter::default()
                };
                if let Err(e) = self.menu.set_filter(filter).await {
                    tracing::warn!(view = %view, error = %e, "Initial menu load failed");
                }
            }
            View::Kitchen | View::ActiveOrders | View::Payments => {
                if let Some(kind) = target
                    && let Err(e) = self.board_or_create(kind).start().await
                {
                    tracing::warn!(board = %kind, error = %e, "Initial board load failed");
                }
            }
        }
        Ok(())
    }

    fn board_or_create(&mut self, kind: BoardKind) -> &ViewSynchronizer<R> {
        let repo = self.repo.clone();
        let config = &self.config;
        self.boards
            .entry(kind)
            .or_insert_with(|| ViewSynchronizer::from_config(repo, kind, config))
    }

    pub fn board(&self, kind: BoardKind) -> Option<&ViewSynchronizer<R>> {
        self.boards.get(&kind)
    }

    /// Board of the current view
    pub fn current_board(&self) -> ClientResult<&ViewSynchronizer<R>> {
        self.view
            .and_then(BoardKind::from_view)
            .and_then(|kind| self.boards.get(&kind))
            .ok_or_else(|| {
                ClientError::from(AppError::permission_denied("Current view has no order board"))
            })
    }

    pub fn menu(&self) -> &MenuCatalogView<R> {
        &self.menu
    }

    // ========================================================================
    // Draft
    // ========================================================================

    pub fn draft(&self) -> &DraftOrder {
        &self.draft
    }

    /// Replace the draft with `f(draft)`
    pub fn edit_draft(&mut self, f: impl FnOnce(&DraftOrder) -> DraftOrder) -> &DraftOrder {
        self.draft = f(&self.draft);
        &self.draft
    }

    /// Submit the draft; on success the draft is cleared
    pub async fn submit_draft(&mut self) -> ClientResult<Order> {
        let role = self.require_role()?;
        let order = OrderActions::new(self.repo.clone())
            .submit_draft(role, &self.draft)
            .await?;
        self.draft = DraftOrder::new();
        Ok(order)
    }

    // ========================================================================
    // Board actions
    // ========================================================================

    pub async fn transition(&self, order_id: &str, to: OrderStatus) -> ClientResult<Order> {
        let role = self.require_role()?;
        self.current_board()?.transition(role, order_id, to).await
    }

    pub async fn pay(&self, order_id: &str, payment: &PaymentRequest) -> ClientResult<PaymentReceipt> {
        let role = self.require_role()?;
        self.current_board()?.pay(role, order_id, payment).await
    }

    pub async fn refresh(&self) -> ClientResult<RefreshOutcome> {
        self.current_board()?.refresh().await
    }

    pub fn set_auto_refresh(&self, enabled: bool) -> ClientResult<()> {
        self.current_board()?.set_auto_refresh(enabled);
        Ok(())
    }
}
