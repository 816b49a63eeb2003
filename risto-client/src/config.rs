//! Client configuration

use crate::{ClientError, ClientResult};
use std::time::Duration;

/// Default API gateway base URL (order and menu routes share it)
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000/api";

/// Client configuration for the order and menu services
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ORDER_SERVICE_URL | http://localhost:3000/api | order service base URL |
/// | MENU_SERVICE_URL | http://localhost:3000/api | menu service base URL |
/// | REQUEST_TIMEOUT_SECS | 30 | per-request timeout |
/// | KITCHEN_REFRESH_SECS | 10 | kitchen board poll interval |
/// | ACTIVE_ORDERS_REFRESH_SECS | 30 | active-orders board poll interval |
/// | PAYMENTS_REFRESH_SECS | 5 | payments board poll interval |
/// | LOG_LEVEL | info | default log level when `RUST_LOG` is unset |
/// | LOG_DIR | (unset) | directory for daily rolling log files |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Order service base URL (e.g. "http://localhost:3000/api")
    pub order_service_url: String,
    /// Menu service base URL
    pub menu_service_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub kitchen_refresh_secs: u64,
    pub active_orders_refresh_secs: u64,
    pub payments_refresh_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Both services behind one gateway URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            order_service_url: base_url.clone(),
            menu_service_url: base_url,
            timeout_secs: 30,
            kitchen_refresh_secs: 10,
            active_orders_refresh_secs: 30,
            payments_refresh_secs: 5,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Load configuration from the environment (and `.env` when present)
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let defaults = Self::default();
        Self {
            order_service_url: std::env::var("ORDER_SERVICE_URL")
                .unwrap_or(defaults.order_service_url),
            menu_service_url: std::env::var("MENU_SERVICE_URL")
                .unwrap_or(defaults.menu_service_url),
            timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            kitchen_refresh_secs: std::env::var("KITCHEN_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.kitchen_refresh_secs),
            active_orders_refresh_secs: std::env::var("ACTIVE_ORDERS_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.active_orders_refresh_secs),
            payments_refresh_secs: std::env::var("PAYMENTS_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.payments_refresh_secs),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
        }
    }

    /// Reject configurations the client cannot run with
    pub fn validate(&self) -> ClientResult<()> {
        if self.order_service_url.trim().is_empty() {
            return Err(ClientError::Config("order service URL is empty".into()));
        }
        if self.menu_service_url.trim().is_empty() {
            return Err(ClientError::Config("menu service URL is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("request timeout must be positive".into()));
        }
        if self.kitchen_refresh_secs == 0
            || self.active_orders_refresh_secs == 0
            || self.payments_refresh_secs == 0
        {
            return Err(ClientError::Config("refresh intervals must be positive".into()));
        }
        Ok(())
    }

    pub fn with_order_service_url(mut self, url: impl Into<String>) -> Self {
        self.order_service_url = url.into();
        self
    }

    pub fn with_menu_service_url(mut self, url: impl Into<String>) -> Self {
        self.menu_service_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_kitchen_refresh(mut self, seconds: u64) -> Self {
        self.kitchen_refresh_secs = seconds;
        self
    }

    pub fn with_active_orders_refresh(mut self, seconds: u64) -> Self {
        self.active_orders_refresh_secs = seconds;
        self
    }

    pub fn with_payments_refresh(mut self, seconds: u64) -> Self {
        self.payments_refresh_secs = seconds;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.order_service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.menu_service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.kitchen_refresh_secs, 10);
        assert_eq!(config.active_orders_refresh_secs, 30);
        assert_eq!(config.payments_refresh_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new("http://gw:8000/api")
            .with_menu_service_url("http://menu:3001/api")
            .with_timeout(5)
            .with_kitchen_refresh(2);
        assert_eq!(config.order_service_url, "http://gw:8000/api");
        assert_eq!(config.menu_service_url, "http://menu:3001/api");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.kitchen_refresh_secs, 2);
    }

    #[test]
    fn test_validate_rejects_zero_and_empty() {
        assert!(ClientConfig::default().with_timeout(0).validate().is_err());
        assert!(ClientConfig::default().with_payments_refresh(0).validate().is_err());
        assert!(ClientConfig::new("  ").validate().is_err());
    }
}
