//! Application state shared by every screen.
//!
//! [`ShopState`] is constructed once and handed to whatever needs it. Reads
//! go through shared references to the collections; writes go through the
//! methods here, which delegate to the collection's own operation and then
//! notify every subscribed [`StateObserver`]. With a
//! [`StoragePersister`] subscribed, each mutation is persisted before the
//! method returns.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use yasira_core::{ProductId, ProductSnapshot, VariantSelection};

use crate::cart::{Cart, CartRecord, LineKey};
use crate::checkout::{CheckoutError, OrderConfirmation, PricingPolicy};
use crate::clock::{Clock, SystemClock};
use crate::collections::{CompareList, SetRecord, ToggleOutcome, Wishlist};
use crate::config::StoreConfig;
use crate::error::{CartError, CollectionError};
use crate::persistence::{
    Change, PersistenceAdapter, StateObserver, StateStorage, StorageKey, StoragePersister,
};
use crate::session::{
    AccountDirectory, AccountSession, AuthError, SessionRecord, UserProfile, UserProfileUpdate,
};

/// The cart, wishlist, compare list and account session.
pub struct ShopState {
    cart: Cart,
    wishlist: Wishlist,
    compare: CompareList,
    session: AccountSession,
    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn StateObserver>>,
}

impl std::fmt::Debug for ShopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopState")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("compare", &self.compare)
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ShopState {
    /// Empty collections, the demo accounts and the system clock. No observers.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            compare: CompareList::new(config.compare_capacity),
            session: AccountSession::new(AccountDirectory::demo()),
            clock: Box::new(SystemClock),
            observers: Vec::new(),
        }
    }

    /// Seed every collection from storage and persist future mutations there.
    ///
    /// Missing or unreadable records leave that collection empty.
    #[instrument(skip_all)]
    pub fn restore<S>(adapter: PersistenceAdapter<S>, config: &StoreConfig) -> Self
    where
        S: StateStorage + 'static,
    {
        let cart = adapter
            .load::<CartRecord>(StorageKey::Cart)
            .map_or_else(Cart::new, Cart::from_record);
        let wishlist = adapter
            .load::<SetRecord>(StorageKey::Wishlist)
            .map_or_else(Wishlist::new, Wishlist::from_record);
        let compare = adapter
            .load::<SetRecord>(StorageKey::Compare)
            .map_or_else(
                || CompareList::new(config.compare_capacity),
                |record| CompareList::from_record(record, config.compare_capacity),
            );
        let session = adapter
            .load::<SessionRecord>(StorageKey::Session)
            .map_or_else(
                || AccountSession::new(AccountDirectory::demo()),
                |record| AccountSession::from_record(record, AccountDirectory::demo()),
            );

        info!(
            cart_lines = cart.lines().len(),
            wishlist = wishlist.count(),
            compare = compare.count(),
            signed_in = session.is_authenticated(),
            "Restored storefront state"
        );

        let mut state = Self::new(config);
        state.cart = cart;
        state.wishlist = wishlist;
        state.compare = compare;
        state.session = session;
        state.subscribe(StoragePersister::new(adapter));
        state
    }

    /// Replace the time source used for timestamps and order numbers.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the accounts used for sign-in. Signs out any current session.
    #[must_use]
    pub fn with_accounts(mut self, directory: AccountDirectory) -> Self {
        self.session = AccountSession::new(directory);
        self
    }

    /// Register a hook called after every mutation.
    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn notify(&mut self, slot: StorageKey) {
        debug!(slot = slot.name(), observers = self.observers.len(), "State changed");
        for observer in &mut self.observers {
            let change = match slot {
                StorageKey::Cart => Change::Cart(&self.cart),
                StorageKey::Wishlist => Change::Wishlist(&self.wishlist),
                StorageKey::Compare => Change::Compare(&self.compare),
                StorageKey::Session => Change::Session(&self.session),
            };
            observer.on_change(change);
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// The compare list.
    #[must_use]
    pub const fn compare(&self) -> &CompareList {
        &self.compare
    }

    /// The account session.
    #[must_use]
    pub const fn session(&self) -> &AccountSession {
        &self.session
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// See [`Cart::add_item`].
    ///
    /// # Errors
    ///
    /// Propagates the cart's rejection; nothing is persisted in that case.
    pub fn add_to_cart(
        &mut self,
        product: ProductSnapshot,
        selection: VariantSelection,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let line_quantity = self.cart.add_item(product, selection, quantity)?;
        self.notify(StorageKey::Cart);
        Ok(line_quantity)
    }

    /// See [`Cart::remove_item`].
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> usize {
        let removed = self.cart.remove_item(product_id);
        self.notify(StorageKey::Cart);
        removed
    }

    /// See [`Cart::remove_line`].
    pub fn remove_cart_line(&mut self, key: &LineKey) -> bool {
        let removed = self.cart.remove_line(key);
        self.notify(StorageKey::Cart);
        removed
    }

    /// See [`Cart::update_quantity`].
    ///
    /// # Errors
    ///
    /// Propagates the cart's rejection; nothing is persisted in that case.
    pub fn update_cart_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<usize, CartError> {
        let affected = self.cart.update_quantity(product_id, quantity)?;
        self.notify(StorageKey::Cart);
        Ok(affected)
    }

    /// See [`Cart::update_line_quantity`].
    ///
    /// # Errors
    ///
    /// Propagates the cart's rejection; nothing is persisted in that case.
    pub fn update_cart_line_quantity(
        &mut self,
        key: &LineKey,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let found = self.cart.update_line_quantity(key, quantity)?;
        self.notify(StorageKey::Cart);
        Ok(found)
    }

    /// See [`Cart::clear_cart`].
    pub fn clear_cart(&mut self) {
        self.cart.clear_cart();
        self.notify(StorageKey::Cart);
    }

    /// Flip the cart drawer. Drawer state is not persisted.
    pub const fn toggle_cart(&mut self) -> bool {
        self.cart.toggle_open()
    }

    /// Show the cart drawer.
    pub const fn open_cart(&mut self) {
        self.cart.open();
    }

    /// Hide the cart drawer.
    pub const fn close_cart(&mut self) {
        self.cart.close();
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// See [`Wishlist::add_item`].
    pub fn add_to_wishlist(&mut self, product: ProductSnapshot) -> bool {
        let now = self.now();
        let added = self.wishlist.add_item(product, now);
        self.notify(StorageKey::Wishlist);
        added
    }

    /// See [`Wishlist::remove_item`].
    pub fn remove_from_wishlist(&mut self, product_id: ProductId) -> bool {
        let removed = self.wishlist.remove_item(product_id);
        self.notify(StorageKey::Wishlist);
        removed
    }

    /// See [`Wishlist::toggle_item`].
    pub fn toggle_wishlist(&mut self, product: ProductSnapshot) -> bool {
        let now = self.now();
        let added = self.wishlist.toggle_item(product, now);
        self.notify(StorageKey::Wishlist);
        added
    }

    /// See [`Wishlist::clear`].
    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();
        self.notify(StorageKey::Wishlist);
    }

    // =========================================================================
    // Compare
    // =========================================================================

    /// See [`CompareList::add_item`].
    ///
    /// # Errors
    ///
    /// Propagates the compare list's rejection; nothing is persisted in that case.
    pub fn add_to_compare(&mut self, product: ProductSnapshot) -> Result<(), CollectionError> {
        let now = self.now();
        self.compare.add_item(product, now)?;
        self.notify(StorageKey::Compare);
        Ok(())
    }

    /// See [`CompareList::remove_item`].
    pub fn remove_from_compare(&mut self, product_id: ProductId) -> bool {
        let removed = self.compare.remove_item(product_id);
        self.notify(StorageKey::Compare);
        removed
    }

    /// See [`CompareList::toggle_item`].
    pub fn toggle_compare(&mut self, product: ProductSnapshot) -> ToggleOutcome {
        let now = self.now();
        let outcome = self.compare.toggle_item(product, now);
        if outcome.succeeded() {
            self.notify(StorageKey::Compare);
        }
        outcome
    }

    /// See [`CompareList::clear`].
    pub fn clear_compare(&mut self) {
        self.compare.clear();
        self.notify(StorageKey::Compare);
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// See [`AccountSession::login`].
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection.
    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let profile = self.session.login(email, password)?;
        self.notify(StorageKey::Session);
        Ok(profile)
    }

    /// See [`AccountSession::register`].
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection.
    pub fn register(&mut self, name: &str, email: &str) -> Result<UserProfile, AuthError> {
        let now = self.now();
        let profile = self.session.register(name, email, now)?;
        self.notify(StorageKey::Session);
        Ok(profile)
    }

    /// See [`AccountSession::login_with_google`].
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection.
    pub fn login_with_google(&mut self) -> Result<UserProfile, AuthError> {
        let now = self.now();
        let profile = self.session.login_with_google(now)?;
        self.notify(StorageKey::Session);
        Ok(profile)
    }

    /// See [`AccountSession::logout`].
    pub fn logout(&mut self) -> bool {
        let was_signed_in = self.session.logout();
        self.notify(StorageKey::Session);
        was_signed_in
    }

    /// See [`AccountSession::update_profile`].
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection.
    pub fn update_profile(&mut self, update: UserProfileUpdate) -> Result<UserProfile, AuthError> {
        let profile = self.session.update_profile(update)?;
        self.notify(StorageKey::Session);
        Ok(profile)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Place an order for the current cart and empty it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart and
    /// `CheckoutError::NotAuthenticated` when signed out. The cart is left
    /// untouched on error.
    #[instrument(skip(self, policy))]
    pub fn place_order(
        &mut self,
        policy: &PricingPolicy,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !self.session.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }

        let confirmation = OrderConfirmation::new(&self.cart, policy, self.now());
        self.clear_cart();
        info!(
            order_number = %confirmation.order_number,
            total = %confirmation.summary.total,
            lines = confirmation.lines.len(),
            "Order placed"
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::clock::FixedClock;
    use crate::persistence::MemoryStorage;

    fn product(id: i64, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(
            ProductId::new(id),
            format!("Product {id}"),
            "YASIRA BEAUTY",
            Decimal::new(cents, 2),
        )
    }

    fn recording_state() -> (ShopState, Rc<RefCell<Vec<StorageKey>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = ShopState::new(&StoreConfig::default());
        let sink = Rc::clone(&seen);
        state.subscribe(move |change: Change<'_>| sink.borrow_mut().push(change.slot()));
        (state, seen)
    }

    #[test]
    fn test_each_mutation_notifies_once() {
        let (mut state, seen) = recording_state();
        state.add_to_cart(product(1, 1000), VariantSelection::none(), 1).unwrap();
        state.toggle_wishlist(product(2, 500));
        state.add_to_compare(product(3, 700)).unwrap();
        state.clear_cart();

        assert_eq!(
            *seen.borrow(),
            vec![StorageKey::Cart, StorageKey::Wishlist, StorageKey::Compare, StorageKey::Cart]
        );
    }

    #[test]
    fn test_rejections_do_not_notify() {
        let (mut state, seen) = recording_state();
        assert!(state.add_to_cart(product(1, 1000), VariantSelection::none(), 0).is_err());
        state.add_to_compare(product(1, 1000)).unwrap();
        assert!(state.add_to_compare(product(1, 1000)).is_err());
        assert!(state.login("user@yasira.com", "wrong").is_err());

        assert_eq!(*seen.borrow(), vec![StorageKey::Compare]);
    }

    #[test]
    fn test_drawer_does_not_notify() {
        let (mut state, seen) = recording_state();
        assert!(state.toggle_cart());
        state.close_cart();
        state.open_cart();
        assert!(state.cart().is_open());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_wishlist_uses_injected_clock() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut state = ShopState::new(&StoreConfig::default()).with_clock(FixedClock(at));
        state.add_to_wishlist(product(1, 100));
        assert_eq!(state.wishlist().entries()[0].added_at(), at);
    }

    #[test]
    fn test_restore_persists_mutations() {
        let storage = Rc::new(MemoryStorage::new());
        let config = StoreConfig::default();
        let adapter = PersistenceAdapter::new(Rc::clone(&storage), "test");

        let mut state = ShopState::restore(adapter, &config);
        state.add_to_cart(product(1, 2899), VariantSelection::none(), 3).unwrap();
        state.toggle_wishlist(product(2, 2299));

        assert_eq!(storage.keys(), vec!["test:cart-storage", "test:wishlist-storage"]);

        let adapter = PersistenceAdapter::new(Rc::clone(&storage), "test");
        let reloaded = ShopState::restore(adapter, &config);
        assert_eq!(reloaded.cart(), state.cart());
        assert_eq!(reloaded.cart().total(), Decimal::new(8697, 2));
        assert!(reloaded.wishlist().is_in_wishlist(ProductId::new(2)));
    }

    #[test]
    fn test_custom_accounts_replace_demo() {
        let directory = AccountDirectory::empty().with_account(
            UserProfile {
                id: yasira_core::UserId::new(9),
                name: "Amira".to_owned(),
                email: yasira_core::Email::parse("amira@yasira.com").unwrap(),
                role: yasira_core::UserRole::Customer,
                avatar: None,
            },
            "rose".into(),
        );
        let mut state = ShopState::new(&StoreConfig::default()).with_accounts(directory);

        assert_eq!(
            state.login("user@yasira.com", "user123"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(state.login("amira@yasira.com", "rose").unwrap().name, "Amira");
    }

    #[test]
    fn test_google_sign_in_notifies_session() {
        let at = Utc.timestamp_millis_opt(1_720_000_000_000).unwrap();
        let (state, seen) = recording_state();
        let mut state = state.with_clock(FixedClock(at));

        let profile = state.login_with_google().unwrap();

        assert_eq!(profile.id, yasira_core::UserId::new(1_720_000_000_000));
        assert!(state.session().is_authenticated());
        assert_eq!(*seen.borrow(), vec![StorageKey::Session]);
    }

    #[test]
    fn test_place_order_requires_sign_in() {
        let mut state = ShopState::new(&StoreConfig::default());
        let policy = PricingPolicy::default();
        assert_eq!(state.place_order(&policy), Err(CheckoutError::EmptyCart));

        state.add_to_cart(product(1, 4500), VariantSelection::none(), 1).unwrap();
        assert_eq!(state.place_order(&policy), Err(CheckoutError::NotAuthenticated));
        assert_eq!(state.cart().item_count(), 1);
    }

    #[test]
    fn test_place_order_clears_cart() {
        let at = Utc.timestamp_millis_opt(1_720_000_000_000).unwrap();
        let (state, seen) = recording_state();
        let mut state = state.with_clock(FixedClock(at));
        state.login("user@yasira.com", "user123").unwrap();
        state.add_to_cart(product(1, 4500), VariantSelection::none(), 1).unwrap();

        let confirmation = state.place_order(&PricingPolicy::default()).unwrap();

        assert_eq!(confirmation.order_number, "YB-1720000000000");
        assert_eq!(confirmation.summary.total.display(), "€59.99");
        assert_eq!(confirmation.lines.len(), 1);
        assert!(state.cart().is_empty());
        assert_eq!(seen.borrow().last(), Some(&StorageKey::Cart));
    }
}
