//! Property tests for cart transitions and session round-trips.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use storefront_cart::{
    CartAction, CartLine, CartSessionStore, CartState, MemorySessionStorage, Product, ProductId,
    selectors, transition,
};

fn product(id: u8, price_cents: u32) -> Product {
    Product {
        id: ProductId::new(format!("p{id}")),
        title: format!("Product {id}"),
        price: f64::from(price_cents) / 100.0,
        category: "misc".to_string(),
        description: String::new(),
        image: String::new(),
    }
}

/// A valid cart: unique ids, counts at least 1
fn arb_cart() -> impl Strategy<Value = CartState> {
    prop::collection::vec((0_u8..20, 0_u32..100_000, 1_u32..50), 0..10).prop_map(|lines| {
        let mut seen = HashSet::new();
        CartState::from_items(
            lines
                .into_iter()
                .filter(|(id, _, _)| seen.insert(*id))
                .map(|(id, cents, count)| CartLine::from_product(product(id, cents), count))
                .collect(),
        )
    })
}

fn arb_action() -> impl Strategy<Value = CartAction> {
    prop_oneof![
        (0_u8..20, 0_u32..100_000, prop::option::of(1_u32..50))
            .prop_map(|(id, cents, quantity)| product(id, cents).to_add_action(quantity)),
        (0_u8..20).prop_map(|id| CartAction::RemoveItem {
            id: ProductId::new(format!("p{id}"))
        }),
        (0_u8..20, -5_i64..50).prop_map(|(id, count)| CartAction::UpdateCount {
            id: ProductId::new(format!("p{id}")),
            count,
        }),
        Just(CartAction::ClearCart),
    ]
}

fn count_of(state: &CartState, id: &ProductId) -> u32 {
    state.get(id).map_or(0, |line| line.count)
}

proptest! {
    #[test]
    fn add_merges_by_id(cart in arb_cart(), id in 0_u8..20, cents in 0_u32..1000, quantity in 1_u32..50) {
        let product = product(id, cents);
        let before = count_of(&cart, &product.id);
        let lines_before = cart.items.len();
        let existed = cart.contains(&product.id);

        let after = transition(cart.clone(), product.to_add_action(Some(quantity)));

        prop_assert_eq!(count_of(&after, &product.id), before + quantity);
        prop_assert_eq!(after.items.len(), lines_before + usize::from(!existed));
        if existed {
            let order_before: Vec<_> = cart.items.iter().map(|l| l.id.clone()).collect();
            let order_after: Vec<_> = after.items.iter().map(|l| l.id.clone()).collect();
            prop_assert_eq!(order_before, order_after);
        } else {
            prop_assert_eq!(&after.items.last().unwrap().id, &product.id);
        }
    }

    #[test]
    fn remove_drops_exactly_one_id(cart in arb_cart(), id in 0_u8..20) {
        let id = ProductId::new(format!("p{id}"));

        let after = transition(cart.clone(), CartAction::RemoveItem { id: id.clone() });

        prop_assert!(!after.contains(&id));
        let expected: Vec<_> = cart.items.into_iter().filter(|l| l.id != id).collect();
        prop_assert_eq!(after.items, expected);
    }

    #[test]
    fn transitions_preserve_invariants(cart in arb_cart(), actions in prop::collection::vec(arb_action(), 0..30)) {
        let state = actions.into_iter().fold(cart, transition);

        let mut seen = HashSet::new();
        for line in &state.items {
            prop_assert!(line.count >= 1);
            prop_assert!(seen.insert(line.id.clone()));
        }
        let expected: u64 = state.items.iter().map(|l| u64::from(l.count)).sum();
        prop_assert_eq!(selectors::total_item_count(&state), expected);
    }

    #[test]
    fn save_then_load_round_trips(cart in arb_cart()) {
        let session = CartSessionStore::with_default_key(Arc::new(MemorySessionStorage::new()));

        session.save(&cart.items);

        prop_assert_eq!(session.load(), cart.items);
    }
}
