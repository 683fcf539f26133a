//! # Storefront Cart
//!
//! The shopping cart of a storefront client, built on the storefront
//! reducer/store runtime.
//!
//! - [`types`]: products, cart lines, the cart state and its actions
//! - [`reducer`]: the pure [`transition`] function and the [`CartReducer`]
//!   that pairs it with session persistence
//! - [`selectors`]: item count, totals, price formatting
//! - [`session`]: session-scoped storage backends and the cart's encoding
//! - [`input`]: validation of user-entered quantities
//! - [`catalog`], [`orders`], [`checkout`]: browsing, order placement and
//!   order history
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use storefront_cart::{
//!     CartSessionStore, MemorySessionStorage, Product, ProductId, open_cart_store, selectors,
//! };
//!
//! # tokio_test::block_on(async {
//! let session = CartSessionStore::with_default_key(Arc::new(MemorySessionStorage::new()));
//! let store = open_cart_store(Arc::new(session));
//!
//! let mug = Product {
//!     id: ProductId::new("1"),
//!     title: "Mug".to_string(),
//!     price: 10.0,
//!     category: "kitchen".to_string(),
//!     description: String::new(),
//!     image: String::new(),
//! };
//! store.send(mug.to_add_action(Some(2))).await.unwrap();
//!
//! let total = store.state(selectors::total_price).await;
//! assert_eq!(selectors::format_price(total), "$20.00");
//! # });
//! ```

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod input;
pub mod orders;
pub mod reducer;
pub mod selectors;
pub mod session;
pub mod types;

use std::sync::Arc;
use storefront_runtime::{Store, StoreConfig};

pub use catalog::{Catalog, DEFAULT_PAGE_SIZE, InMemoryCatalog, Page, paginate};
pub use checkout::Checkout;
pub use config::CartConfig;
pub use error::{CheckoutError, ServiceError};
pub use input::InputError;
pub use orders::{
    CurrentUser, InMemoryOrderBook, NewOrder, Order, OrderHistory, OrderId, OrderService, UserId,
};
pub use reducer::{CartEnvironment, CartReducer, transition};
pub use session::{
    CartSessionStore, FileSessionStorage, MemorySessionStorage, SessionStorage, StorageError,
};
pub use types::{CartAction, CartLine, CartState, Product, ProductId};

/// The cart's store
pub type CartStore = Store<CartState, CartAction, CartEnvironment, CartReducer>;

/// Create a cart store hydrated from `session`
///
/// The initial state is whatever [`CartSessionStore::load`] returns, so a
/// missing or corrupt session starts with an empty cart.
#[must_use]
pub fn open_cart_store(session: Arc<CartSessionStore>) -> CartStore {
    open_cart_store_with_config(session, StoreConfig::default())
}

/// Create a hydrated cart store with a custom runtime configuration
#[must_use]
pub fn open_cart_store_with_config(session: Arc<CartSessionStore>, config: StoreConfig) -> CartStore {
    let initial = CartState::from_items(session.load());
    tracing::debug!(lines = initial.items.len(), key = session.key(), "Opened cart store");
    Store::with_config(
        initial,
        CartReducer::new(),
        CartEnvironment::new(session),
        config,
    )
}
