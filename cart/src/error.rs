//! Error types for remote collaborators and checkout.

use storefront_runtime::StoreError;
use thiserror::Error;

/// Result type alias for calls to remote services.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failures reported by the catalog, order service or order history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Service could not be reached or refused the request.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Service answered with something the client cannot use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal state of an in-process implementation is unusable.
    #[error("Internal service error")]
    Internal,
}

/// Reasons checkout did not place an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// No signed-in user.
    #[error("You must be logged in to place an order")]
    NotAuthenticated,

    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order service rejected or failed the submission; the cart is kept.
    #[error("Order submission failed: {0}")]
    Submission(#[source] ServiceError),

    /// The order was placed but the cart could not be cleared.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),
}
