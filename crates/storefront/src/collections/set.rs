//! Shared set logic behind the wishlist and compare list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use yasira_core::{ProductId, ProductSnapshot};

use crate::error::CollectionError;

/// A product held in a set, stamped with when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntry {
    #[serde(flatten)]
    product: ProductSnapshot,
    added_at: DateTime<Utc>,
}

impl SetEntry {
    /// Wrap a snapshot.
    #[must_use]
    pub const fn new(product: ProductSnapshot, added_at: DateTime<Utc>) -> Self {
        Self { product, added_at }
    }

    /// The stored snapshot.
    #[must_use]
    pub const fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    /// When the product entered the set.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// Serializable subset of a set: its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Entries in insertion order.
    pub items: Vec<SetEntry>,
}

/// Ordered entries plus an id index for constant-time membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSet {
    entries: Vec<SetEntry>,
    index: HashSet<ProductId>,
    capacity: Option<usize>,
}

impl ProductSet {
    /// A set with no size bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A set that holds at most `capacity` entries.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Rebuild from persisted entries.
    ///
    /// Duplicate ids keep their first entry. Entries past the capacity are
    /// dropped so a lowered bound still holds after restore.
    #[must_use]
    pub fn from_record(record: SetRecord, capacity: Option<usize>) -> Self {
        let mut set = Self {
            capacity,
            ..Self::default()
        };
        for entry in record.items {
            let id = entry.product.id;
            if set.index.contains(&id) {
                warn!(product_id = %id, "Dropping duplicate persisted entry");
                continue;
            }
            if set.is_full() {
                warn!(product_id = %id, "Dropping persisted entry beyond capacity");
                continue;
            }
            set.index.insert(id);
            set.entries.push(entry);
        }
        set
    }

    /// The entries to persist.
    #[must_use]
    pub fn to_record(&self) -> SetRecord {
        SetRecord {
            items: self.entries.clone(),
        }
    }

    /// Insert a product unless it is present or the set is full.
    ///
    /// # Errors
    ///
    /// `AlreadyPresent` takes precedence over `CapacityExceeded`.
    pub fn try_add(
        &mut self,
        product: ProductSnapshot,
        added_at: DateTime<Utc>,
    ) -> Result<(), CollectionError> {
        if self.index.contains(&product.id) {
            return Err(CollectionError::AlreadyPresent(product.id));
        }
        if let Some(capacity) = self.capacity.filter(|cap| self.entries.len() >= *cap) {
            return Err(CollectionError::CapacityExceeded { capacity });
        }
        self.index.insert(product.id);
        self.entries.push(SetEntry::new(product, added_at));
        Ok(())
    }

    /// Delete the entry for `product_id`. Returns whether it existed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        if !self.index.remove(&product_id) {
            return false;
        }
        self.entries.retain(|entry| entry.product.id != product_id);
        true
    }

    /// Membership by id.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.index.contains(&product_id)
    }

    /// Remove every entry. The capacity is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[SetEntry] {
        &self.entries
    }

    /// Size bound, or `None` for an unbounded set.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Whether another distinct product would fit.
    #[must_use]
    pub fn can_add_more(&self) -> bool {
        !self.is_full()
    }

    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.entries.len() >= cap)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64) -> ProductSnapshot {
        ProductSnapshot::new(
            ProductId::new(id),
            format!("Product {id}"),
            "YASIRA BEAUTY",
            Decimal::new(1999, 2),
        )
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_try_add_and_contains() {
        let mut set = ProductSet::unbounded();
        set.try_add(product(1), at(0)).unwrap();

        assert!(set.contains(ProductId::new(1)));
        assert!(!set.contains(ProductId::new(2)));
        assert_eq!(set.entries()[0].added_at(), at(0));
    }

    #[test]
    fn test_duplicate_keeps_original_timestamp() {
        let mut set = ProductSet::unbounded();
        set.try_add(product(1), at(0)).unwrap();
        let err = set.try_add(product(1), at(60)).unwrap_err();

        assert_eq!(err, CollectionError::AlreadyPresent(ProductId::new(1)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries()[0].added_at(), at(0));
    }

    #[test]
    fn test_bounded_rejects_when_full() {
        let mut set = ProductSet::bounded(2);
        set.try_add(product(1), at(0)).unwrap();
        set.try_add(product(2), at(1)).unwrap();

        assert!(!set.can_add_more());
        assert_eq!(
            set.try_add(product(3), at(2)),
            Err(CollectionError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(
            set.try_add(product(1), at(3)),
            Err(CollectionError::AlreadyPresent(ProductId::new(1)))
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_frees_capacity() {
        let mut set = ProductSet::bounded(1);
        set.try_add(product(1), at(0)).unwrap();
        assert!(set.remove(ProductId::new(1)));
        assert!(!set.remove(ProductId::new(1)));
        assert!(set.try_add(product(2), at(1)).is_ok());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut set = ProductSet::bounded(3);
        set.try_add(product(1), at(0)).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(ProductId::new(1)));
        assert_eq!(set.capacity(), Some(3));
    }

    #[test]
    fn test_from_record_dedupes_and_truncates() {
        let record = SetRecord {
            items: vec![
                SetEntry::new(product(1), at(0)),
                SetEntry::new(product(1), at(1)),
                SetEntry::new(product(2), at(2)),
                SetEntry::new(product(3), at(3)),
            ],
        };
        let set = ProductSet::from_record(record, Some(2));

        let ids: Vec<_> = set.entries().iter().map(|e| e.product().id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
        assert_eq!(set.entries()[0].added_at(), at(0));
    }

    #[test]
    fn test_record_layout() {
        let mut set = ProductSet::unbounded();
        set.try_add(product(5), at(0)).unwrap();
        let value = serde_json::to_value(set.to_record()).unwrap();

        assert_eq!(value["items"][0]["productId"], 5);
        assert_eq!(value["items"][0]["addedAt"], "2023-11-14T22:13:20Z");
    }
}
