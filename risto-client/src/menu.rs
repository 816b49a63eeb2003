//! Menu catalog view with optimistic availability toggle

use crate::optimistic::OptimisticUpdate;
use crate::repository::MenuRepository;
use crate::{ClientError, ClientResult};
use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuFilter, MenuItem, MenuItemUpdate};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Default)]
struct CatalogState {
    items: Vec<MenuItem>,
    /// Items with a toggle in flight
    pending: HashSet<String>,
    /// Latest failure not yet shown to the user
    error: Option<ClientError>,
}

pub struct MenuCatalogView<R> {
    repo: Arc<R>,
    filter: Mutex<MenuFilter>,
    state: Mutex<CatalogState>,
}

impl<R: MenuRepository> MenuCatalogView<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            filter: Mutex::new(MenuFilter::default()),
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Load the catalog with the current filter
    pub async fn load(&self) -> ClientResult<usize> {
        let filter = self.filter.lock().clone();
        match self.repo.list_menu(&filter).await {
            Ok(items) => {
                let count = items.len();
                self.state.lock().items = items;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Menu load failed");
                self.state.lock().error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub async fn set_filter(&self, filter: MenuFilter) -> ClientResult<usize> {
        *self.filter.lock() = filter;
        self.load().await
    }

    pub fn items(&self) -> Vec<MenuItem> {
        self.state.lock().items.clone()
    }

    pub fn item(&self, id: &str) -> Option<MenuItem> {
        self.state.lock().items.iter().find(|i| i.id == id).cloned()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.state.lock().pending.contains(id)
    }

    /// Pending error, returned once
    pub fn take_error(&self) -> Option<ClientError> {
        self.state.lock().error.take()
    }

    /// Clear items, pending toggles and errors
    pub fn reset(&self) {
        *self.state.lock() = CatalogState::default();
        *self.filter.lock() = MenuFilter::default();
    }

    fn set_local_availability(&self, id: &str, available: bool) {
        if let Some(item) = self.state.lock().items.iter_mut().find(|i| i.id == id) {
            item.is_available = available;
        }
    }

    /// Flip an item's availability
    ///
    /// The flag flips locally before the service answers. On failure the
    /// previous value is restored and one error is recorded. A second toggle
    /// on the same item while the first is in flight is refused.
    pub async fn toggle_availability(&self, id: &str) -> ClientResult<MenuItem> {
        let prior = {
            let mut state = self.state.lock();
            let prior = state
                .items
                .iter()
                .find(|i| i.id == id)
                .map(|i| i.is_available)
                .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound).with_detail("id", id))?;
            if !state.pending.insert(id.to_string()) {
                return Err(AppError::new(ErrorCode::AvailabilityUpdatePending)
                    .with_detail("id", id)
                    .into());
            }
            prior
        };

        let update = OptimisticUpdate::new(prior, !prior, |v| self.set_local_availability(id, v));
        let result = update
            .run(self.repo.update_menu_item(id, &MenuItemUpdate::availability(!prior)))
            .await;

        let mut state = self.state.lock();
        state.pending.remove(id);
        match result {
            Ok(item) => {
                if let Some(slot) = state.items.iter_mut().find(|i| i.id == id) {
                    *slot = item.clone();
                }
                tracing::info!(menu_item_id = %id, is_available = item.is_available, "Availability updated");
                Ok(item)
            }
            Err(e) => {
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }
}
