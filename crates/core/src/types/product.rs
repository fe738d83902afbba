//! Product snapshots and variant selections.
//!
//! A [`ProductSnapshot`] is a by-value copy of the catalog fields taken when
//! a shopper interacts with a product. Collections own their snapshots, so a
//! later catalog edit never rewrites what is already in a cart or wishlist.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// Catalog fields captured at the moment of interaction.
///
/// Serialized with the field names used by persisted state (`productId`,
/// `unitPrice`). The catalog's own `id`/`price` spellings are accepted on
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Stable catalog identifier.
    #[serde(rename = "productId", alias = "id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Unit price in the storefront currency. Never negative for valid products.
    #[serde(rename = "unitPrice", alias = "price")]
    pub price: Decimal,
    /// Primary image URL.
    #[serde(default)]
    pub image: String,
    /// Catalog category (e.g., "lipstick").
    #[serde(default)]
    pub category: String,
    /// Available colors, if the product comes in several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    /// Available sizes or shades, if the product comes in several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
}

impl ProductSnapshot {
    /// Create a snapshot with no variant metadata.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        brand: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
            price,
            image: String::new(),
            category: String::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the available colors.
    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the available sizes.
    #[must_use]
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// The unit price in the given currency.
    #[must_use]
    pub const fn unit_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency)
    }

    /// The variant a product page preselects: the first color and first size.
    #[must_use]
    pub fn default_selection(&self) -> VariantSelection {
        VariantSelection {
            color: self.colors.first().cloned(),
            size: self.sizes.first().cloned(),
        }
    }
}

/// The color and size a shopper picked for a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSelection {
    /// Selected color, if any.
    pub color: Option<String>,
    /// Selected size, if any.
    pub size: Option<String>,
}

impl VariantSelection {
    /// No color or size chosen.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            color: None,
            size: None,
        }
    }

    /// Choose a color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Choose a size.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lipstick() -> ProductSnapshot {
        ProductSnapshot::new(
            ProductId::new(1),
            "Velvet Matte Lipstick",
            "YASIRA BEAUTY",
            Decimal::new(2899, 2),
        )
        .with_category("lipstick")
        .with_colors(["Ruby Red", "Deep Berry"])
    }

    #[test]
    fn test_serializes_with_persisted_field_names() {
        let value = serde_json::to_value(lipstick()).unwrap();
        assert_eq!(value["productId"], 1);
        assert_eq!(value["unitPrice"], "28.99");
        assert!(value.get("sizes").is_none());
    }

    #[test]
    fn test_deserializes_catalog_spelling() {
        let json = r#"{
            "id": 3,
            "name": "Flawless Coverage Foundation",
            "brand": "YASIRA BEAUTY",
            "price": "42.99",
            "sizes": ["Light", "Medium"],
            "rating": 4.9
        }"#;
        let product: ProductSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Decimal::new(4299, 2));
        assert_eq!(product.sizes, vec!["Light", "Medium"]);
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_default_selection_picks_first_variant() {
        let selection = lipstick().default_selection();
        assert_eq!(selection, VariantSelection::none().color("Ruby Red"));
    }

    #[test]
    fn test_unit_price_display() {
        assert_eq!(
            lipstick().unit_price(CurrencyCode::EUR).display(),
            "€28.99"
        );
    }
}
