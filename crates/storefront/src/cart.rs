//! Shopping cart line items and derived totals.
//!
//! Lines merge on the `(product, color, size)` triple: adding the same
//! product in the same variant bumps the existing line, a different variant
//! becomes its own line. Totals are computed from the lines on every read.
//!
//! Removal by product id is deliberately *not* variant-scoped:
//! [`Cart::remove_item`] and [`Cart::update_quantity`] act on every line of
//! the product. The variant-scoped forms are [`Cart::remove_line`] and
//! [`Cart::update_line_quantity`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use yasira_core::{CurrencyCode, Price, ProductId, ProductSnapshot, VariantSelection};

use crate::error::CartError;

/// Merge identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product the line is for.
    pub product_id: ProductId,
    /// Chosen color, if any.
    pub selected_color: Option<String>,
    /// Chosen size, if any.
    pub selected_size: Option<String>,
}

impl LineKey {
    /// Key for a product in the given variant.
    #[must_use]
    pub fn new(product_id: ProductId, selection: VariantSelection) -> Self {
        Self {
            product_id,
            selected_color: selection.color,
            selected_size: selection.size,
        }
    }
}

/// One product/variant/quantity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    product: ProductSnapshot,
    #[serde(default)]
    selected_color: Option<String>,
    #[serde(default)]
    selected_size: Option<String>,
    quantity: u32,
}

impl CartLine {
    /// The product snapshot this line was created from.
    #[must_use]
    pub const fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    /// Chosen color.
    #[must_use]
    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    /// Chosen size.
    #[must_use]
    pub fn selected_size(&self) -> Option<&str> {
        self.selected_size.as_deref()
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// Merge identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id,
            selected_color: self.selected_color.clone(),
            selected_size: self.selected_size.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_color == key.selected_color
            && self.selected_size == key.selected_size
    }
}

/// Serializable subset of the cart: its lines, never the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Lines in insertion order.
    pub items: Vec<CartLine>,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    is_open: bool,
}

impl Cart {
    /// An empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Lines that could never have been produced by the cart's own
    /// operations (zero quantity, negative price, a total out of range) are
    /// dropped, and duplicate keys are merged.
    #[must_use]
    pub fn from_record(record: CartRecord) -> Self {
        let mut cart = Self::new();
        for line in record.items {
            let product_id = line.product.id;
            if line.quantity == 0 || line.product.price.is_sign_negative() {
                warn!(product_id = %product_id, "Dropping invalid persisted cart line");
                continue;
            }
            let key = line.key();
            if let Err(err) = cart.merge(line.product, key, line.quantity) {
                warn!(product_id = %product_id, error = %err, "Dropping persisted cart line");
            }
        }
        cart
    }

    /// The lines to persist.
    #[must_use]
    pub fn to_record(&self) -> CartRecord {
        CartRecord {
            items: self.lines.clone(),
        }
    }

    /// Add `quantity` units of a product in the given variant.
    ///
    /// Returns the quantity of the affected line after the add.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a quantity of zero,
    /// `CartError::NegativePrice` for a snapshot with a negative price and
    /// `CartError::Overflow` when the line quantity or the cart total would
    /// leave the representable range. The cart is unchanged on error.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        selection: VariantSelection,
        quantity: u32,
    ) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if product.price.is_sign_negative() {
            return Err(CartError::NegativePrice(product.id));
        }
        let key = LineKey::new(product.id, selection);
        self.merge(product, key, quantity)
    }

    fn merge(
        &mut self,
        product: ProductSnapshot,
        key: LineKey,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let overflow = CartError::Overflow(key.product_id);
        let existing = self.lines.iter().position(|line| line.matches(&key));

        let (price, merged) = match existing.and_then(|idx| self.lines.get(idx)) {
            Some(line) => (
                line.product.price,
                line.quantity.checked_add(quantity).ok_or(overflow)?,
            ),
            None => (product.price, quantity),
        };
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|&(idx, _)| Some(idx) != existing)
            .map(|(_, line)| (line.product.price, line.quantity));
        let candidate = others.chain(std::iter::once((price, merged)));
        checked_total(candidate).ok_or(overflow)?;

        if let Some(line) = existing.and_then(|idx| self.lines.get_mut(idx)) {
            line.quantity = merged;
            debug!(product_id = %key.product_id, quantity = merged, "Merged cart line");
            return Ok(merged);
        }

        self.lines.push(CartLine {
            product,
            selected_color: key.selected_color,
            selected_size: key.selected_size,
            quantity,
        });
        debug!(product_id = %key.product_id, quantity, "Appended cart line");
        Ok(quantity)
    }

    /// Remove every line for the product, whatever its variant.
    ///
    /// Returns the number of lines removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        before - self.lines.len()
    }

    /// Remove the single line with this key. Returns whether it existed.
    pub fn remove_line(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        before != self.lines.len()
    }

    /// Set the quantity on every line of the product.
    ///
    /// A quantity of zero behaves like [`Cart::remove_item`]. Returns the
    /// number of lines affected.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if the cart total would leave the
    /// representable range. The cart is unchanged on error.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<usize, CartError> {
        if quantity == 0 {
            return Ok(self.remove_item(product_id));
        }
        self.check_total_with(quantity, CartError::Overflow(product_id), |line| {
            line.product.id == product_id
        })?;

        let mut affected = 0;
        for line in self.lines.iter_mut().filter(|l| l.product.id == product_id) {
            line.quantity = quantity;
            affected += 1;
        }
        Ok(affected)
    }

    /// Set the quantity of the single line with this key.
    ///
    /// A quantity of zero removes the line. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if the cart total would leave the
    /// representable range. The cart is unchanged on error.
    pub fn update_line_quantity(
        &mut self,
        key: &LineKey,
        quantity: u32,
    ) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove_line(key));
        }
        self.check_total_with(quantity, CartError::Overflow(key.product_id), |line| {
            line.matches(key)
        })?;

        Ok(match self.lines.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        })
    }

    /// Fails with `err` unless the total stays representable after setting
    /// `quantity` on every line selected by `affected`.
    fn check_total_with(
        &self,
        quantity: u32,
        err: CartError,
        affected: impl Fn(&CartLine) -> bool,
    ) -> Result<(), CartError> {
        let lines = self.lines.iter().map(|line| {
            let qty = if affected(line) { quantity } else { line.quantity };
            (line.product.price, qty)
        });
        checked_total(lines).map(|_| ()).ok_or(err)
    }

    /// Empty the cart. The drawer state is left alone.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line with this key, if present.
    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Whether any line holds the product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lines.iter().any(|line| line.product.id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `Σ unit price × quantity`, unrounded.
    ///
    /// Every mutation keeps this sum representable.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The total as a [`Price`] in the given currency.
    #[must_use]
    pub fn total_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.total(), currency)
    }

    /// `Σ quantity`.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the cart drawer is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show the cart drawer.
    pub const fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the cart drawer.
    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Flip the cart drawer and return the new state.
    pub const fn toggle_open(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }
}

/// `Σ price × quantity`, or `None` if any step overflows.
fn checked_total(lines: impl IntoIterator<Item = (Decimal, u32)>) -> Option<Decimal> {
    lines.into_iter().try_fold(Decimal::ZERO, |acc, (price, quantity)| {
        price
            .checked_mul(Decimal::from(quantity))
            .and_then(|line| acc.checked_add(line))
    })
}
