//! Integration tests for the Yasira storefront state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yasira-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Shopper flows through `ShopState`
//! - `persistence_roundtrip` - State surviving a restart on disk
//! - `properties` - Invariants over generated operation sequences
//!
//! This library holds the fixtures those tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use yasira_core::{ProductId, ProductSnapshot};
use yasira_storefront::{FixedClock, ShopState, StoreConfig};

/// Brand every fixture product carries.
pub const BRAND: &str = "YASIRA BEAUTY";

/// A product priced at `cents / 100`.
#[must_use]
pub fn product(id: i64, cents: i64) -> ProductSnapshot {
    ProductSnapshot::new(
        ProductId::new(id),
        format!("Product {id}"),
        BRAND,
        Decimal::new(cents, 2),
    )
}

/// Image URL carried by [`lipstick`].
pub const LIPSTICK_IMAGE: &str = "https://images.unsplash.com/photo-1617422275563-4cf1103e7d60";

/// The Velvet Matte Lipstick at 28.99 with its four shades.
#[must_use]
pub fn lipstick() -> ProductSnapshot {
    ProductSnapshot::new(
        ProductId::new(1),
        "Velvet Matte Lipstick",
        BRAND,
        Decimal::new(2899, 2),
    )
    .with_image(LIPSTICK_IMAGE)
    .with_category("lipstick")
    .with_colors(["Ruby Red", "Deep Berry", "Classic Rose", "Nude Pink"])
}

/// A fixed instant for deterministic timestamps and order numbers.
#[must_use]
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_720_000_000_000)
        .single()
        .unwrap_or_default()
}

/// Default-configured state on a fixed clock, with no storage attached.
#[must_use]
pub fn detached_state() -> ShopState {
    ShopState::new(&StoreConfig::default()).with_clock(FixedClock(fixed_instant()))
}

/// Catalog JSON in the shape the storefront ships, unknown fields included.
pub const CATALOG_JSON: &str = r#"[
  {"id": 1, "name": "Velvet Matte Lipstick", "brand": "YASIRA BEAUTY", "price": 28.99,
   "originalPrice": 35.99, "category": "lipstick", "rating": 4.8,
   "colors": ["Ruby Red", "Deep Berry", "Classic Rose", "Nude Pink"], "tags": ["bestseller"]},
  {"id": 2, "name": "Glossy Lip Tint", "brand": "YASIRA BEAUTY", "price": 22.99,
   "category": "lipstick", "colors": ["Clear", "Pink Shimmer"]},
  {"id": 3, "name": "Flawless Coverage Foundation", "brand": "YASIRA BEAUTY", "price": 42.99,
   "category": "foundation"},
  {"id": 4, "name": "Radiant Glow Serum Foundation", "brand": "YASIRA BEAUTY", "price": 38.99,
   "category": "foundation"},
  {"id": 5, "name": "Golden Hour Eyeshadow Palette", "brand": "YASIRA BEAUTY", "price": 52.99,
   "category": "eyeshadow"}
]"#;
