//! Error types for storefront state.
//!
//! Collection rejections are part of normal operation and are returned to
//! the caller as values to display. Persistence failures are logged and
//! degraded at the storage seam, so they only reach callers that talk to a
//! [`StateStorage`](crate::persistence::StateStorage) directly.

use thiserror::Error;
use yasira_core::ProductId;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::session::AuthError;

/// A set collection refused an add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The product is already in the set.
    #[error("product {0} is already in this list")]
    AlreadyPresent(ProductId),

    /// The set is full.
    #[error("at most {capacity} products can be compared")]
    CapacityExceeded {
        /// Configured maximum size.
        capacity: usize,
    },
}

/// A cart operation was given input it does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// Lines are added with a quantity of at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product snapshot carries a negative unit price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The line quantity or the cart total would leave the representable range.
    #[error("adding product {0} would overflow the cart")]
    Overflow(ProductId),
}

/// Durable storage could not be read or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend is unreachable or an I/O call failed.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The stored value is not a valid record.
    #[error("stored state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The stored record was written by an incompatible version.
    #[error("stored state has version {found}, expected {expected}")]
    VersionMismatch {
        /// Version found in storage.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },
}

/// Application-level error type for the storefront state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A wishlist or compare add was rejected.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// A cart operation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Storage failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Checkout could not proceed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Sign-in or profile operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The requested product is not in the catalog.
    #[error("product {0} not found in catalog")]
    ProductNotFound(ProductId),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_error_display() {
        let err = CollectionError::AlreadyPresent(ProductId::new(3));
        assert_eq!(err.to_string(), "product 3 is already in this list");

        let err = CollectionError::CapacityExceeded { capacity: 4 };
        assert_eq!(err.to_string(), "at most 4 products can be compared");
    }

    #[test]
    fn test_store_error_is_transparent_for_rejections() {
        let err = StoreError::from(CartError::InvalidQuantity);
        assert_eq!(err.to_string(), "quantity must be at least 1");

        let err = StoreError::ProductNotFound(ProductId::new(99));
        assert_eq!(err.to_string(), "product 99 not found in catalog");
    }

    #[test]
    fn test_persistence_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = PersistenceError::from(io);
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
