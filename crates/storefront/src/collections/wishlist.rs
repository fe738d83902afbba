//! Wishlist: an unbounded set of saved products.

use chrono::{DateTime, Utc};

use yasira_core::{ProductId, ProductSnapshot};

use super::set::{ProductSet, SetEntry, SetRecord};

/// Products the shopper saved for later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    set: ProductSet,
}

impl Wishlist {
    /// An empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries.
    #[must_use]
    pub fn from_record(record: SetRecord) -> Self {
        Self {
            set: ProductSet::from_record(record, None),
        }
    }

    /// The entries to persist.
    #[must_use]
    pub fn to_record(&self) -> SetRecord {
        self.set.to_record()
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add_item(&mut self, product: ProductSnapshot, added_at: DateTime<Utc>) -> bool {
        self.set.try_add(product, added_at).is_ok()
    }

    /// Unsave a product. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        self.set.remove(product_id)
    }

    /// Whether the product is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.set.contains(product_id)
    }

    /// Remove if saved, save otherwise. Returns `true` when the product was added.
    pub fn toggle_item(&mut self, product: ProductSnapshot, added_at: DateTime<Utc>) -> bool {
        if self.set.remove(product.id) {
            false
        } else {
            self.add_item(product, added_at)
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Number of saved products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.set.len()
    }

    /// Saved products in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[SetEntry] {
        self.set.entries()
    }
}
