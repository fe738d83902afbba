//! Change notifications from the state container.

use tracing::warn;

use super::{PersistenceAdapter, StateStorage, StorageKey};
use crate::cart::Cart;
use crate::collections::{CompareList, Wishlist};
use crate::session::AccountSession;

/// The collection a mutation touched, borrowed in its new state.
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    /// The cart changed.
    Cart(&'a Cart),
    /// The wishlist changed.
    Wishlist(&'a Wishlist),
    /// The compare list changed.
    Compare(&'a CompareList),
    /// The account session changed.
    Session(&'a AccountSession),
}

impl Change<'_> {
    /// Storage slot for the changed collection.
    #[must_use]
    pub const fn slot(&self) -> StorageKey {
        match self {
            Self::Cart(_) => StorageKey::Cart,
            Self::Wishlist(_) => StorageKey::Wishlist,
            Self::Compare(_) => StorageKey::Compare,
            Self::Session(_) => StorageKey::Session,
        }
    }
}

/// Hook invoked after every mutation routed through
/// [`ShopState`](crate::state::ShopState).
pub trait StateObserver {
    /// Called once per mutation with the collection's new state.
    fn on_change(&mut self, change: Change<'_>);
}

impl<F> StateObserver for F
where
    F: FnMut(Change<'_>),
{
    fn on_change(&mut self, change: Change<'_>) {
        self(change);
    }
}

/// Writes the changed collection's record to storage.
///
/// Failures are logged and swallowed; the in-memory state stays
/// authoritative for the rest of the session.
#[derive(Debug)]
pub struct StoragePersister<S> {
    adapter: PersistenceAdapter<S>,
}

impl<S: StateStorage> StoragePersister<S> {
    /// Persist through `adapter`.
    #[must_use]
    pub const fn new(adapter: PersistenceAdapter<S>) -> Self {
        Self { adapter }
    }
}

impl<S: StateStorage> StateObserver for StoragePersister<S> {
    fn on_change(&mut self, change: Change<'_>) {
        let slot = change.slot();
        let result = match change {
            Change::Cart(cart) => self.adapter.save(slot, &cart.to_record()),
            Change::Wishlist(wishlist) => self.adapter.save(slot, &wishlist.to_record()),
            Change::Compare(compare) => self.adapter.save(slot, &compare.to_record()),
            Change::Session(session) => self.adapter.save(slot, &session.to_record()),
        };
        if let Err(e) = result {
            warn!(key = %self.adapter.key(slot), error = %e, "Failed to persist state");
        }
    }
}
