//! Product catalog access and paging.

use crate::error::{ServiceError, ServiceResult};
use crate::types::Product;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Default number of products per page
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Read access to the product catalog
pub trait Catalog: Send + Sync {
    /// List products, optionally restricted to one category
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the catalog cannot be queried.
    fn products(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = ServiceResult<Vec<Product>>> + Send;

    /// List the distinct categories
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the catalog cannot be queried.
    fn categories(&self) -> impl Future<Output = ServiceResult<Vec<String>>> + Send;
}

/// Catalog held in memory
///
/// Clones share the same product list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryCatalog {
    /// Creates a catalog with the given products, in listing order
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    /// Adds a product, or replaces the one with the same id
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] if the catalog lock is poisoned.
    pub fn upsert(&self, product: Product) -> ServiceResult<()> {
        let mut products = self.products.write().map_err(|_| ServiceError::Internal)?;
        if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            products.push(product);
        }
        Ok(())
    }
}

impl Catalog for InMemoryCatalog {
    fn products(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = ServiceResult<Vec<Product>>> + Send {
        let products = Arc::clone(&self.products);
        let category = category.map(str::to_string);

        async move {
            let products = products.read().map_err(|_| ServiceError::Internal)?;
            Ok(products
                .iter()
                .filter(|p| category.as_deref().is_none_or(|c| p.category == c))
                .cloned()
                .collect())
        }
    }

    fn categories(&self) -> impl Future<Output = ServiceResult<Vec<String>>> + Send {
        let products = Arc::clone(&self.products);

        async move {
            let products = products.read().map_err(|_| ServiceError::Internal)?;
            let mut categories: Vec<String> = Vec::new();
            for product in products.iter() {
                if !categories.contains(&product.category) {
                    categories.push(product.category.clone());
                }
            }
            Ok(categories)
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: usize,
    /// Number of pages, at least 1
    pub total_pages: usize,
    /// Number of items across all pages
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into the requested page
///
/// `page` is clamped to `1..=total_pages`, so out-of-range requests serve the
/// nearest valid page. A `per_page` of 0 is treated as 1.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}
