//! Domain types for the cart.
//!
//! A cart is an ordered list of [`CartLine`]s, one per product, each carrying
//! a copy of the catalog fields taken when the product was added.

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

/// Stable identifier of a catalog product
///
/// Matches the identifier space of the product catalog. Older payloads use
/// integer ids, so both JSON strings and integers are accepted on input; the
/// id is always written back as a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a `ProductId` from any string-like value
    ///
    /// The id must be non-empty to be persisted; the reducer ignores an
    /// `AddItem` whose product id is empty. Use
    /// [`crate::input::parse_product_id`] for untrusted input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty id, which can never be persisted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) if text.is_empty() => {
                Err(de::Error::custom("product id must not be empty"))
            },
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

/// A product as returned by the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Unit price, non-negative
    pub price: f64,
    /// Catalog category
    pub category: String,
    /// Long description
    pub description: String,
    /// Image URL
    pub image: String,
}

impl Product {
    /// Builds the `AddItem` action for this product
    ///
    /// `quantity` must already be validated (see [`crate::input`]); `None`
    /// adds a single unit.
    #[must_use]
    pub fn to_add_action(&self, quantity: Option<u32>) -> CartAction {
        CartAction::AddItem {
            product: self.clone(),
            quantity,
        }
    }
}

/// One product's presence in the cart
///
/// Invariant: `count >= 1`. A line whose count would drop to zero is removed
/// instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier
    pub id: ProductId,
    /// Title copied from the catalog
    pub title: String,
    /// Unit price copied from the catalog
    pub price: f64,
    /// Category copied from the catalog
    pub category: String,
    /// Description copied from the catalog
    pub description: String,
    /// Image URL copied from the catalog
    pub image: String,
    /// Quantity, always at least 1
    pub count: u32,
}

impl CartLine {
    /// Creates a line for `product` with the given count
    #[must_use]
    pub fn from_product(product: Product, count: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            category: product.category,
            description: product.description,
            image: product.image,
            count,
        }
    }
}

/// The cart
///
/// Lines are kept in insertion order and are unique by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Cart lines in insertion order
    pub items: Vec<CartLine>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a cart holding `items` as-is
    #[must_use]
    pub const fn from_items(items: Vec<CartLine>) -> Self {
        Self { items }
    }

    /// Returns the line for `id`
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Checks if a line for `id` exists
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Returns true when the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Inputs to the cart reducer
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    /// Add `quantity` units of `product` (default 1), merging into an
    /// existing line with the same id
    AddItem {
        /// Product to add
        product: Product,
        /// Units to add; validated upstream to be at least 1
        quantity: Option<u32>,
    },

    /// Remove the line for `id`, if any
    RemoveItem {
        /// Product to remove
        id: ProductId,
    },

    /// Set the count of an existing line; `count <= 0` is ignored
    UpdateCount {
        /// Product to update
        id: ProductId,
        /// New count
        count: i64,
    },

    /// Empty the cart
    ClearCart,

    /// Reload the cart from the session store
    HydrateFromStore,

    /// Session store snapshot, replacing the cart wholesale
    Hydrated {
        /// Lines read from the store
        items: Vec<CartLine>,
    },
}
