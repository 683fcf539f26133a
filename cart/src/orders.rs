//! Orders: the identity checkout needs, the order document, and the services
//! that store and list orders.

use crate::error::{ServiceError, ServiceResult};
use crate::types::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Identifier of an authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` from the identity provider's uid
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user, as reported by the identity provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    /// Stable user id
    pub uid: UserId,
    /// Email address, if the provider exposes one
    pub email: Option<String>,
}

impl CurrentUser {
    /// Creates a `CurrentUser`
    #[must_use]
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            email,
        }
    }
}

/// Identifier assigned to a stored order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random `OrderId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order document as submitted at checkout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Owner of the order
    pub user_id: UserId,
    /// Cart lines at checkout time
    pub items: Vec<CartLine>,
    /// Unrounded total at checkout time
    pub total_price: f64,
    /// When the order was placed
    pub created_at: DateTime<Utc>,
}

/// A stored order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Assigned id
    pub id: OrderId,
    /// Owner of the order
    pub user_id: UserId,
    /// When the order was placed
    pub created_at: DateTime<Utc>,
    /// Unrounded total
    pub total_price: f64,
    /// Lines as ordered
    pub items: Vec<CartLine>,
}

impl Order {
    /// Promotes a submitted order to a stored one
    #[must_use]
    pub fn from_new(id: OrderId, order: NewOrder) -> Self {
        Self {
            id,
            user_id: order.user_id,
            created_at: order.created_at,
            total_price: order.total_price,
            items: order.items,
        }
    }
}

/// Accepts orders placed at checkout
pub trait OrderService: Send + Sync {
    /// Store a new order
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the order could not be stored.
    fn submit_order(&self, order: NewOrder) -> impl Future<Output = ServiceResult<OrderId>> + Send;
}

/// Lists a user's past orders
pub trait OrderHistory: Send + Sync {
    /// Orders belonging to `user`, newest first
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the history cannot be queried.
    fn orders_for_user(
        &self,
        user: &UserId,
    ) -> impl Future<Output = ServiceResult<Vec<Order>>> + Send;
}

/// In-memory order store
///
/// Implements both [`OrderService`] and [`OrderHistory`]. Clones share the
/// same orders. [`InMemoryOrderBook::set_unavailable`] makes every call fail
/// with [`ServiceError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderBook {
    orders: Arc<Mutex<Vec<Order>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryOrderBook {
    /// Creates an empty order book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored orders across all users
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] if the lock is poisoned.
    pub fn len(&self) -> ServiceResult<usize> {
        Ok(self.orders.lock().map_err(|_| ServiceError::Internal)?.len())
    }

    /// Whether no orders have been stored
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] if the lock is poisoned.
    pub fn is_empty(&self) -> ServiceResult<bool> {
        self.len().map(|len| len == 0)
    }

    fn check_available(unavailable: &AtomicBool) -> ServiceResult<()> {
        if unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("order book offline".to_string()));
        }
        Ok(())
    }
}

impl OrderService for InMemoryOrderBook {
    fn submit_order(&self, order: NewOrder) -> impl Future<Output = ServiceResult<OrderId>> + Send {
        let orders = Arc::clone(&self.orders);
        let unavailable = Arc::clone(&self.unavailable);

        async move {
            Self::check_available(&unavailable)?;

            let id = OrderId::new();
            orders
                .lock()
                .map_err(|_| ServiceError::Internal)?
                .push(Order::from_new(id, order));

            tracing::info!(order_id = %id, "Order stored");
            Ok(id)
        }
    }
}

impl OrderHistory for InMemoryOrderBook {
    fn orders_for_user(
        &self,
        user: &UserId,
    ) -> impl Future<Output = ServiceResult<Vec<Order>>> + Send {
        let orders = Arc::clone(&self.orders);
        let unavailable = Arc::clone(&self.unavailable);
        let user = user.clone();

        async move {
            Self::check_available(&unavailable)?;

            let mut mine: Vec<Order> = orders
                .lock()
                .map_err(|_| ServiceError::Internal)?
                .iter()
                .filter(|order| order.user_id == user)
                .cloned()
                .collect();
            // Ties keep the latest submission first
            mine.reverse();
            mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(mine)
        }
    }
}
