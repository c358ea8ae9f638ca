//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use photoart_core::account::sample_order_history;
use photoart_core::{Catalog, OrderHistoryEntry, UserId};
use tokio::sync::RwLock;

use crate::auth::{AuthBackend, backend_from_config};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the identity backend, the catalog, and order history.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: Arc<dyn AuthBackend>,
    catalog: Catalog,
    orders: OrderHistory,
}

impl AppState {
    /// Create application state with the backend selected by `config`.
    ///
    /// In mock mode the demo user starts with a few past orders.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let auth = backend_from_config(&config);
        let orders = if config.supabase.is_none() {
            OrderHistory::seeded(UserId::new("1"), sample_order_history())
        } else {
            OrderHistory::default()
        };
        Self::with_backend(config, auth, orders)
    }

    /// Create application state around an explicit backend.
    #[must_use]
    pub fn with_backend(
        config: StorefrontConfig,
        auth: Arc<dyn AuthBackend>,
        orders: OrderHistory,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog: Catalog::sample(),
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the identity backend.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthBackend {
        self.inner.auth.as_ref()
    }

    /// Get the photo catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the order history store.
    #[must_use]
    pub fn orders(&self) -> &OrderHistory {
        &self.inner.orders
    }
}

/// Orders placed by signed-in users, newest first. Lives for the lifetime of
/// the process.
#[derive(Debug, Default)]
pub struct OrderHistory {
    by_user: RwLock<HashMap<UserId, Vec<OrderHistoryEntry>>>,
}

impl OrderHistory {
    /// History with `entries` already recorded for `user`.
    #[must_use]
    pub fn seeded(user: UserId, mut entries: Vec<OrderHistoryEntry>) -> Self {
        entries.sort_by(|a, b| b.placed_on.cmp(&a.placed_on));
        Self {
            by_user: RwLock::new(HashMap::from([(user, entries)])),
        }
    }

    /// Record a new order for `user`.
    pub async fn record(&self, user: &UserId, entry: OrderHistoryEntry) {
        self.by_user
            .write()
            .await
            .entry(user.clone())
            .or_default()
            .insert(0, entry);
    }

    /// All orders for `user`, newest first.
    pub async fn for_user(&self, user: &UserId) -> Vec<OrderHistoryEntry> {
        self.by_user
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use photoart_core::{OrderStatus, Price};

    use super::*;

    #[tokio::test]
    async fn test_mock_mode_seeds_demo_orders() {
        let state = AppState::new(StorefrontConfig::local());
        let orders = state.orders().for_user(&UserId::new("1")).await;
        let numbers: Vec<_> = orders.iter().map(|o| o.number.as_str()).collect();
        assert_eq!(numbers, ["ORD-12347", "ORD-12346", "ORD-12345"]);
        assert!(state.orders().for_user(&UserId::new("2")).await.is_empty());
    }

    #[tokio::test]
    async fn test_record_puts_newest_first() {
        let history = OrderHistory::default();
        let user = UserId::new("u");
        for (number, day) in [("ORD-00001", 1), ("ORD-00002", 2)] {
            history
                .record(
                    &user,
                    OrderHistoryEntry {
                        number: number.to_string(),
                        placed_on: NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default(),
                        status: OrderStatus::Processing,
                        total: Price::ZERO,
                        item_count: 1,
                    },
                )
                .await;
        }
        let orders = history.for_user(&user).await;
        assert_eq!(orders.first().map(|o| o.number.as_str()), Some("ORD-00002"));
    }
}
