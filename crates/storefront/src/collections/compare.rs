//! Compare list: a bounded set of products shown side by side.

use chrono::{DateTime, Utc};

use yasira_core::{ProductId, ProductSnapshot};

use super::set::{ProductSet, SetEntry, SetRecord};
use crate::error::CollectionError;

/// Maximum number of products compared at once.
pub const DEFAULT_COMPARE_CAPACITY: usize = 4;

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// An add was attempted.
    Added,
    /// The product was removed.
    Removed,
}

/// Outcome of [`CompareList::toggle_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Which direction the toggle went.
    pub action: ToggleAction,
    /// Whether that action took effect.
    pub result: Result<(), CollectionError>,
}

impl ToggleOutcome {
    /// Whether the toggle changed membership.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Products queued for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareList {
    set: ProductSet,
}

impl Default for CompareList {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARE_CAPACITY)
    }
}

impl CompareList {
    /// An empty list holding at most `capacity` products.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            set: ProductSet::bounded(capacity),
        }
    }

    /// Rebuild from persisted entries, dropping any beyond `capacity`.
    #[must_use]
    pub fn from_record(record: SetRecord, capacity: usize) -> Self {
        Self {
            set: ProductSet::from_record(record, Some(capacity)),
        }
    }

    /// The entries to persist.
    #[must_use]
    pub fn to_record(&self) -> SetRecord {
        self.set.to_record()
    }

    /// Queue a product for comparison.
    ///
    /// # Errors
    ///
    /// `AlreadyPresent` if queued already, `CapacityExceeded` if the list is full.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        added_at: DateTime<Utc>,
    ) -> Result<(), CollectionError> {
        self.set.try_add(product, added_at)
    }

    /// Dequeue a product. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        self.set.remove(product_id)
    }

    /// Whether the product is queued.
    #[must_use]
    pub fn is_in_compare(&self, product_id: ProductId) -> bool {
        self.set.contains(product_id)
    }

    /// Remove if queued, otherwise attempt an add.
    pub fn toggle_item(
        &mut self,
        product: ProductSnapshot,
        added_at: DateTime<Utc>,
    ) -> ToggleOutcome {
        if self.set.remove(product.id) {
            ToggleOutcome {
                action: ToggleAction::Removed,
                result: Ok(()),
            }
        } else {
            ToggleOutcome {
                action: ToggleAction::Added,
                result: self.add_item(product, added_at),
            }
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Number of queued products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.set.len()
    }

    /// Whether one more product would fit.
    #[must_use]
    pub fn can_add_more(&self) -> bool {
        self.set.can_add_more()
    }

    /// The configured bound.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.set.capacity().unwrap_or(DEFAULT_COMPARE_CAPACITY)
    }

    /// Queued products in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[SetEntry] {
        self.set.entries()
    }
}
