//! Roles, views and the permission projector
//!
//! A role is a declared session mode, not a verified credential. Each role
//! opens a fixed, ordered list of views; each view may request a fixed set of
//! status transitions. A transition is permitted when the state machine
//! allows it and a view available to the role offers it.

use crate::error::{AppError, AppResult};
use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

// ============================================================================
// Role
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Waiter,
    Chef,
    Cashier,
    Manager,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Self::Client,
        Self::Waiter,
        Self::Chef,
        Self::Cashier,
        Self::Manager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Waiter => "waiter",
            Self::Chef => "chef",
            Self::Cashier => "cashier",
            Self::Manager => "manager",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Client => "Cliente",
            Self::Waiter => "Cameriere",
            Self::Chef => "Chef",
            Self::Cashier => "Cassiere",
            Self::Manager => "Manager",
        }
    }

    /// Ordered views this role may open
    pub fn permitted_views(&self) -> &'static [View] {
        use View::*;
        match self {
            Self::Client => &[Menu],
            Self::Waiter => &[Menu, MenuManagement, OrderTaking, ActiveOrders],
            Self::Chef => &[Menu, MenuManagement, Kitchen],
            Self::Cashier => &[Menu, ActiveOrders, Payments],
            Self::Manager => &View::ALL,
        }
    }

    /// View opened when the role is selected
    pub fn default_view(&self) -> View {
        self.permitted_views().first().copied().unwrap_or(View::Menu)
    }

    pub fn can_open(&self, view: View) -> bool {
        self.permitted_views().contains(&view)
    }

    pub fn ensure_can_open(&self, view: View) -> AppResult<()> {
        if self.can_open(view) {
            Ok(())
        } else {
            Err(AppError::view_not_permitted(self.as_str(), view.as_str()))
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// View
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Menu,
    MenuManagement,
    OrderTaking,
    ActiveOrders,
    Kitchen,
    Payments,
}

impl View {
    /// Canonical order
    pub const ALL: [View; 6] = [
        Self::Menu,
        Self::MenuManagement,
        Self::OrderTaking,
        Self::ActiveOrders,
        Self::Kitchen,
        Self::Payments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::MenuManagement => "menu-management",
            Self::OrderTaking => "order-taking",
            Self::ActiveOrders => "active-orders",
            Self::Kitchen => "kitchen",
            Self::Payments => "payments",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::MenuManagement => "Gestione Menu",
            Self::OrderTaking => "Presa Ordini",
            Self::ActiveOrders => "Ordini Attivi",
            Self::Kitchen => "Cucina",
            Self::Payments => "Pagamenti",
        }
    }

    /// Whether this view may request `from → to`
    ///
    /// Only encodes the view's capability; legality is checked separately
    /// by the state machine.
    pub fn offers(&self, from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match self {
            Self::Kitchen => matches!((from, to), (Confirmed, Preparing) | (Preparing, Ready)),
            Self::Payments => matches!((from, to), (Ready, Delivered)),
            Self::ActiveOrders => matches!((from, to), (Confirmed | Preparing, Cancelled)),
            Self::Menu | Self::MenuManagement | Self::OrderTaking => false,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Projector
// ============================================================================

pub fn permitted_views(role: Role) -> &'static [View] {
    role.permitted_views()
}

/// True when any view open to `role` offers the legal transition `from → to`
pub fn can_transition(role: Role, from: OrderStatus, to: OrderStatus) -> bool {
    role.permitted_views()
        .iter()
        .any(|view| can_transition_in_view(role, *view, from, to))
}

/// Like [`can_transition`] but pinned to one view
pub fn can_transition_in_view(role: Role, view: View, from: OrderStatus, to: OrderStatus) -> bool {
    role.can_open(view) && from.can_transition(to) && view.offers(from, to)
}

/// Guard used before any transition request leaves the client
///
/// An illegal transition fails with `InvalidTransition`; a legal one the
/// role or view cannot request fails with `PermissionDenied`.
pub fn authorize_transition(role: Role, view: View, from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    role.ensure_can_open(view)?;
    from.validate_transition(to)?;
    if !view.offers(from, to) {
        return Err(AppError::permission_denied(format!(
            "View {} cannot move orders from {} to {}",
            view, from, to
        ))
        .with_detail("view", view.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use OrderStatus::*;

    #[test]
    fn test_permitted_views_table() {
        assert_eq!(permitted_views(Role::Client), &[View::Menu]);
        assert_eq!(
            permitted_views(Role::Waiter),
            &[View::Menu, View::MenuManagement, View::OrderTaking, View::ActiveOrders]
        );
        assert_eq!(
            permitted_views(Role::Cashier),
            &[View::Menu, View::ActiveOrders, View::Payments]
        );
        assert_eq!(permitted_views(Role::Manager), &View::ALL);
    }

    #[test]
    fn test_chef_never_gets_payments() {
        assert!(!Role::Chef.can_open(View::Payments));
        assert!(!can_transition(Role::Chef, Ready, Delivered));
        assert_eq!(
            Role::Chef.ensure_can_open(View::Payments).unwrap_err().code,
            ErrorCode::ViewNotPermitted
        );
    }

    #[test]
    fn test_manager_gets_every_non_client_view() {
        let manager = permitted_views(Role::Manager);
        for role in [Role::Waiter, Role::Chef, Role::Cashier] {
            for view in permitted_views(role) {
                assert!(manager.contains(view));
            }
        }
        for view in [View::MenuManagement, View::OrderTaking, View::ActiveOrders, View::Kitchen, View::Payments] {
            assert!(manager.contains(&view));
        }
    }

    #[test]
    fn test_default_view_is_first_permitted() {
        for role in Role::ALL {
            assert_eq!(role.default_view(), View::Menu);
        }
    }

    #[test]
    fn test_can_transition_by_role() {
        assert!(can_transition(Role::Chef, Confirmed, Preparing));
        assert!(can_transition(Role::Chef, Preparing, Ready));
        assert!(!can_transition(Role::Chef, Confirmed, Cancelled));

        assert!(can_transition(Role::Cashier, Ready, Delivered));
        assert!(can_transition(Role::Cashier, Preparing, Cancelled));
        assert!(!can_transition(Role::Cashier, Ready, Cancelled));

        assert!(can_transition(Role::Waiter, Confirmed, Cancelled));
        assert!(!can_transition(Role::Waiter, Confirmed, Preparing));

        for (from, to) in [(Confirmed, Preparing), (Ready, Delivered), (Confirmed, Cancelled)] {
            assert!(!can_transition(Role::Client, from, to));
            assert!(can_transition(Role::Manager, from, to));
        }
    }

    #[test]
    fn test_no_role_moves_illegal_transitions() {
        for role in Role::ALL {
            assert!(!can_transition(role, Ready, Preparing));
            assert!(!can_transition(role, Ready, Cancelled));
            for to in OrderStatus::ALL {
                assert!(!can_transition(role, Delivered, to));
                assert!(!can_transition(role, Cancelled, to));
            }
        }
    }

    #[test]
    fn test_transition_pinned_to_view() {
        assert!(can_transition_in_view(Role::Manager, View::Kitchen, Confirmed, Preparing));
        assert!(!can_transition_in_view(Role::Manager, View::Payments, Confirmed, Preparing));
        assert!(!can_transition_in_view(Role::Waiter, View::Kitchen, Confirmed, Preparing));
    }

    #[test]
    fn test_authorize_transition_errors() {
        let err = authorize_transition(Role::Chef, View::Kitchen, Ready, Preparing).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        let err = authorize_transition(Role::Manager, View::Kitchen, Ready, Delivered).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err = authorize_transition(Role::Waiter, View::Payments, Ready, Delivered).unwrap_err();
        assert_eq!(err.code, ErrorCode::ViewNotPermitted);

        assert!(authorize_transition(Role::Cashier, View::Payments, Ready, Delivered).is_ok());
    }

    #[test]
    fn test_view_wire_names() {
        assert_eq!(serde_json::to_string(&View::MenuManagement).unwrap(), r#""menu-management""#);
        assert_eq!(View::ActiveOrders.as_str(), "active-orders");
    }
}
