//! Reducer logic for the cart.
//!
//! [`transition`] is the whole of the cart's business rules: a pure function
//! from (state, action) to the next state. [`CartReducer`] wraps it for the
//! Store and describes the session writes that keep the persisted copy in
//! step with memory.

use crate::session::CartSessionStore;
use crate::types::{CartAction, CartLine, CartState, ProductId};
use std::sync::Arc;
use storefront_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

/// Compute the next cart state
///
/// Never fails. Unknown or empty ids and non-positive counts leave the state
/// as it was. `HydrateFromStore` is only meaningful to [`CartReducer`], which
/// turns it into a load; here it is a no-op.
#[must_use]
pub fn transition(mut state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem { product, quantity } => {
            let quantity = quantity.unwrap_or(1);
            if quantity == 0 || product.id.is_empty() {
                return state;
            }

            if let Some(line) = find_mut(&mut state.items, &product.id) {
                line.count = line.count.saturating_add(quantity);
            } else {
                state.items.push(CartLine::from_product(product, quantity));
            }
        },
        CartAction::RemoveItem { id } => {
            state.items.retain(|line| line.id != id);
        },
        CartAction::UpdateCount { id, count } => {
            if count <= 0 {
                return state;
            }
            if let Some(line) = find_mut(&mut state.items, &id) {
                line.count = u32::try_from(count).unwrap_or(u32::MAX);
            }
        },
        CartAction::ClearCart => {
            state.items.clear();
        },
        CartAction::HydrateFromStore => {},
        CartAction::Hydrated { items } => {
            state.items = items;
        },
    }

    state
}

fn find_mut<'a>(items: &'a mut [CartLine], id: &ProductId) -> Option<&'a mut CartLine> {
    items.iter_mut().find(|line| &line.id == id)
}

/// Environment dependencies for the cart reducer
#[derive(Clone, Debug)]
pub struct CartEnvironment {
    /// Session store holding the persisted cart
    pub session: Arc<CartSessionStore>,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub const fn new(session: Arc<CartSessionStore>) -> Self {
        Self { session }
    }
}

/// Reducer for the cart
///
/// Applies [`transition`] and returns at most one effect: a save of the new
/// lines when they changed, or a load for `HydrateFromStore`. `Hydrated`
/// never writes back what was just read.
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn persist(env: &CartEnvironment, items: Vec<CartLine>) -> Effect<CartAction> {
        let session = Arc::clone(&env.session);
        async_effect! {
            session.save(&items);
            None
        }
    }

    fn load(env: &CartEnvironment) -> Effect<CartAction> {
        let session = Arc::clone(&env.session);
        async_effect! {
            Some(CartAction::Hydrated { items: session.load() })
        }
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::HydrateFromStore => {
                tracing::debug!("Hydrating cart from session store");
                smallvec![Self::load(env)]
            },
            CartAction::Hydrated { items } => {
                tracing::debug!(lines = items.len(), "Cart hydrated");
                state.items = items;
                SmallVec::new()
            },
            action => {
                let kind = action_kind(&action);
                let next = transition(state.clone(), action);
                let changed = next.items != state.items;
                *state = next;

                if changed {
                    tracing::debug!(action = kind, lines = state.items.len(), "Cart updated");
                    smallvec![Self::persist(env, state.items.clone())]
                } else {
                    tracing::debug!(action = kind, "Cart unchanged");
                    SmallVec::new()
                }
            },
        }
    }
}

const fn action_kind(action: &CartAction) -> &'static str {
    match action {
        CartAction::AddItem { .. } => "add_item",
        CartAction::RemoveItem { .. } => "remove_item",
        CartAction::UpdateCount { .. } => "update_count",
        CartAction::ClearCart => "clear_cart",
        CartAction::HydrateFromStore => "hydrate_from_store",
        CartAction::Hydrated { .. } => "hydrated",
    }
}
