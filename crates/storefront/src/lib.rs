//! Yasira storefront state.
//!
//! The cart, wishlist and compare list a shopper carries between page
//! loads, the mock account session, and the order summary shown at
//! checkout. Everything here is synchronous and in-process; durability
//! comes from a [`StateStorage`](persistence::StateStorage) backend that
//! [`ShopState`](state::ShopState) writes to after each mutation.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use yasira_core::{ProductId, ProductSnapshot, VariantSelection};
//! use yasira_storefront::{ShopState, StoreConfig};
//!
//! let mut state = ShopState::new(&StoreConfig::default());
//! let lipstick = ProductSnapshot::new(
//!     ProductId::new(1),
//!     "Velvet Matte Lipstick",
//!     "YASIRA BEAUTY",
//!     Decimal::new(2899, 2),
//! );
//!
//! state.add_to_cart(lipstick, VariantSelection::none().color("Ruby Red"), 2).unwrap();
//! assert_eq!(state.cart().item_count(), 2);
//! assert_eq!(state.cart().total(), Decimal::new(5798, 2));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod collections;
pub mod config;
pub mod error;
pub mod persistence;
pub mod session;
pub mod state;

pub use cart::{Cart, CartLine, CartRecord, LineKey};
pub use catalog::{
    Catalog, CatalogError, CatalogQuery, CatalogSort, JsonCatalog, QUICK_SEARCH_LIMIT,
};
pub use checkout::{CheckoutError, OrderConfirmation, OrderSummary, PricingPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use collections::{CompareList, ToggleAction, ToggleOutcome, Wishlist};
pub use config::{ConfigError, StoreConfig};
pub use error::{CartError, CollectionError, PersistenceError, Result, StoreError};
pub use persistence::{
    FileStorage, MemoryStorage, PersistenceAdapter, StateObserver, StateStorage, StorageKey,
    StoragePersister,
};
pub use session::{AccountDirectory, AccountSession, AuthError, UserProfile, UserProfileUpdate};
pub use state::ShopState;
