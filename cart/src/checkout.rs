//! Checkout: turn the cart into an order.

use crate::CartStore;
use crate::error::CheckoutError;
use crate::orders::{CurrentUser, NewOrder, OrderId, OrderService};
use crate::selectors;
use crate::types::{CartAction, CartState};
use std::sync::Arc;
use storefront_core::environment::Clock;

/// Places orders from a cart store
pub struct Checkout<O> {
    orders: O,
    clock: Arc<dyn Clock>,
}

impl<O: OrderService> Checkout<O> {
    /// Creates a checkout that submits to `orders`, stamping with `clock`
    #[must_use]
    pub fn new(orders: O, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }

    /// The order service in use
    #[must_use]
    pub const fn orders(&self) -> &O {
        &self.orders
    }

    /// Submit the current cart as an order for `user`
    ///
    /// On success the cart is cleared (and the cleared cart persisted) before
    /// this returns. On any error the cart is left as it was.
    ///
    /// The order is built from a snapshot taken before submission, and the
    /// store lock is not held while the order service runs. Success sends a
    /// whole-cart `ClearCart`, so a line added by another task while the
    /// submission is in flight is cleared without being ordered. Callers that
    /// share one store across tasks must not edit the cart during checkout.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotAuthenticated`] when `user` is `None`
    /// - [`CheckoutError::EmptyCart`] when there is nothing to order
    /// - [`CheckoutError::Submission`] when the order service fails
    /// - [`CheckoutError::Store`] when the order was stored but clearing failed
    #[tracing::instrument(skip_all)]
    pub async fn place_order(
        &self,
        store: &CartStore,
        user: Option<&CurrentUser>,
    ) -> Result<OrderId, CheckoutError> {
        let Some(user) = user else {
            tracing::info!("Checkout rejected: not logged in");
            return Err(CheckoutError::NotAuthenticated);
        };

        let snapshot: CartState = store.state(Clone::clone).await;
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = NewOrder {
            user_id: user.uid.clone(),
            total_price: selectors::total_price(&snapshot),
            items: snapshot.items,
            created_at: self.clock.now(),
        };

        let order_id = match self.orders.submit_order(order).await {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(%error, user = %user.uid, "Order submission failed");
                return Err(CheckoutError::Submission(error));
            },
        };

        store.send(CartAction::ClearCart).await?;
        tracing::info!(%order_id, user = %user.uid, "Order placed");
        Ok(order_id)
    }
}
