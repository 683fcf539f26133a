//! Command-line walkthrough of the storefront cart.
//!
//! Browses a small catalog, fills the cart, reopens the session to show the
//! cart surviving a reload, checks out and lists the order history.
//!
//! Set `STOREFRONT_SESSION_DIR` to persist the session to disk between runs.

use anyhow::Context;
use std::sync::Arc;
use storefront_cart::{
    CartAction, CartConfig, Catalog, Checkout, CheckoutError, CurrentUser, InMemoryCatalog,
    InMemoryOrderBook, OrderHistory, Product, ProductId, input, open_cart_store, paginate,
    selectors,
};
use storefront_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn product(id: &str, title: &str, price: f64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price,
        category: category.to_string(),
        description: format!("{title} from the {category} range"),
        image: format!("https://img.example/{id}.png"),
    }
}

fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        product("1", "Backpack", 109.95, "men's clothing"),
        product("2", "Slim Fit T-Shirt", 22.3, "men's clothing"),
        product("3", "Cotton Jacket", 55.99, "men's clothing"),
        product("5", "Dragon Bracelet", 695.0, "jewelery"),
        product("6", "Solid Gold Petite", 168.0, "jewelery"),
        product("9", "Portable Hard Drive", 64.0, "electronics"),
        product("10", "SSD 1TB", 109.0, "electronics"),
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CartConfig::from_env();
    let session = Arc::new(config.open_session().context("failed to open session storage")?);

    println!("=== Storefront Cart ===\n");

    // Browse
    let catalog = demo_catalog();
    let categories = catalog.categories().await?;
    println!("Categories: {}", categories.join(", "));

    let page = paginate(catalog.products(None).await?, 1, config.page_size);
    println!("\nProducts (page {} of {}):", page.page, page.total_pages);
    for p in &page.items {
        println!("  [{}] {} {}", p.id, p.title, selectors::format_price(p.price));
    }

    // Fill the cart
    let store = open_cart_store(Arc::clone(&session));
    let restored = store.state(|s| s.items.len()).await;
    if restored > 0 {
        println!("\nRestored {restored} line(s) from the previous session");
    }

    let jewelery = catalog.products(Some("jewelery")).await?;
    let electronics = catalog.products(Some("electronics")).await?;

    for p in jewelery.iter().take(1).chain(electronics.iter().take(1)) {
        let quantity = input::parse_quantity("1")?;
        store.send(p.to_add_action(Some(quantity))).await?;
    }
    if let Some(drive) = electronics.first() {
        store
            .send(CartAction::UpdateCount {
                id: drive.id.clone(),
                count: input::parse_count("3")?,
            })
            .await?;
    }

    if let Err(error) = input::parse_quantity("1.5") {
        println!("\nRejected quantity: {error}");
    }

    print_cart(&store).await;

    // Reload: a fresh store over the same session sees the same cart
    let reloaded = open_cart_store(Arc::clone(&session));
    let same = reloaded.state(Clone::clone).await == store.state(Clone::clone).await;
    println!("\nCart survives reload: {same}");

    // Checkout
    let orders = InMemoryOrderBook::new();
    let checkout = Checkout::new(orders.clone(), Arc::new(SystemClock));

    match checkout.place_order(&store, None).await {
        Err(CheckoutError::NotAuthenticated) => {
            println!("\nCheckout without login: {}", CheckoutError::NotAuthenticated);
        },
        other => println!("\nUnexpected checkout result: {other:?}"),
    }

    let user = CurrentUser::new("demo-user", Some("demo@example.com".to_string()));
    let order_id = checkout.place_order(&store, Some(&user)).await?;
    println!("Order placed: {order_id}");
    print_cart(&store).await;

    // History
    let history = orders.orders_for_user(&user.uid).await?;
    println!("\nOrder history for {}:", user.uid);
    for order in &history {
        println!(
            "  {} {} {} item(s) {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M:%S"),
            order.items.iter().map(|l| u64::from(l.count)).sum::<u64>(),
            selectors::format_price(order.total_price),
        );
    }

    Ok(())
}

async fn print_cart(store: &storefront_cart::CartStore) {
    let state = store.state(Clone::clone).await;

    println!("\nCart:");
    if state.is_empty() {
        println!("  (empty)");
    }
    for line in &state.items {
        println!(
            "  {} x{} @ {} = {}",
            line.title,
            line.count,
            selectors::format_price(line.price),
            selectors::format_price(selectors::line_subtotal(line)),
        );
    }
    println!(
        "Total items: {}  Total price: {}",
        selectors::total_item_count(&state),
        selectors::format_price(selectors::total_price(&state)),
    );
}
