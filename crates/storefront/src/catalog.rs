//! Catalog provider.
//!
//! Collections never hold references into the catalog; they copy a
//! [`ProductSnapshot`] out of it at the moment of interaction.
//!
//! Browsing goes through [`Catalog::search`] for free-text lookups and
//! [`Catalog::filter`] with a [`CatalogQuery`] for the catalog page.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use yasira_core::{ProductId, ProductSnapshot};

/// The catalog file could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON array of products.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A sort order name was not recognized.
    #[error("unknown sort order: {0}")]
    UnknownSort(String),
}

/// Maximum number of results shown by the quick search box.
pub const QUICK_SEARCH_LIMIT: usize = 6;

/// Ordering of catalog page results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogSort {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Highest ID first.
    Newest,
    /// Alphabetical by name, ignoring case.
    Name,
}

impl CatalogSort {
    fn apply(self, products: &mut [&ProductSnapshot]) {
        match self {
            Self::Featured => {}
            Self::PriceLow => products.sort_by_key(|p| p.price),
            Self::PriceHigh => products.sort_by_key(|p| Reverse(p.price)),
            Self::Newest => products.sort_by_key(|p| Reverse(p.id)),
            Self::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
        }
    }
}

impl FromStr for CatalogSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "newest" => Ok(Self::Newest),
            "name" => Ok(Self::Name),
            other => Err(CatalogError::UnknownSort(other.to_owned())),
        }
    }
}

/// Filters and ordering for the catalog page. An unset filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Only this category, compared ignoring ASCII case.
    pub category: Option<String>,
    /// Only unit prices inside this inclusive range.
    pub price_range: Option<RangeInclusive<Decimal>>,
    /// Only these brands. Empty means any brand.
    pub brands: Vec<String>,
    /// Result order.
    pub sort: CatalogSort,
}

impl CatalogQuery {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &ProductSnapshot) -> bool {
        let category = self
            .category
            .as_ref()
            .is_none_or(|category| product.category.eq_ignore_ascii_case(category));
        let price = self
            .price_range
            .as_ref()
            .is_none_or(|range| range.contains(&product.price));
        let brand = self.brands.is_empty() || self.brands.contains(&product.brand);
        category && price && brand
    }
}

/// Supplies product snapshots on demand.
pub trait Catalog {
    /// Look up a product by ID.
    fn product(&self, id: ProductId) -> Option<&ProductSnapshot>;

    /// Every product, in catalog order.
    fn products(&self) -> &[ProductSnapshot];

    /// Products whose name, brand or category contains `query`, ignoring
    /// case, in catalog order and capped at `limit` when given.
    fn search(&self, query: &str, limit: Option<usize>) -> Vec<&ProductSnapshot> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products()
            .iter()
            .filter(|p| {
                [&p.name, &p.brand, &p.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Products passing every filter in `query`, in its sort order.
    fn filter(&self, query: &CatalogQuery) -> Vec<&ProductSnapshot> {
        let mut found: Vec<&ProductSnapshot> = self
            .products()
            .iter()
            .filter(|p| query.matches(p))
            .collect();
        query.sort.apply(&mut found);
        debug!(matched = found.len(), sort = ?query.sort, "Filtered catalog");
        found
    }
}

/// A catalog loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    products: Vec<ProductSnapshot>,
    by_id: HashMap<ProductId, usize>,
}

impl JsonCatalog {
    /// Build from already-parsed products. Later duplicates of an ID are ignored.
    #[must_use]
    pub fn new(products: Vec<ProductSnapshot>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            if catalog.by_id.contains_key(&product.id) {
                continue;
            }
            catalog.by_id.insert(product.id, catalog.products.len());
            catalog.products.push(product);
        }
        catalog
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the input is not a product array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductSnapshot> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read and
    /// `CatalogError::Parse` if it is not a product array.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), products = catalog.products.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for JsonCatalog {
    fn product(&self, id: ProductId) -> Option<&ProductSnapshot> {
        self.by_id.get(&id).and_then(|&idx| self.products.get(idx))
    }

    fn products(&self) -> &[ProductSnapshot] {
        &self.products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const CATALOG: &str = r#"[
        {"id": 1, "name": "Velvet Matte Lipstick", "brand": "YASIRA BEAUTY", "price": "28.99",
         "category": "lipstick", "colors": ["Ruby Red", "Nude Pink"], "reviews": 234},
        {"id": 2, "name": "Glossy Lip Tint", "brand": "YASIRA BEAUTY", "price": "22.99",
         "category": "lipstick"},
        {"id": 3, "name": "Flawless Coverage Foundation", "brand": "YASIRA BEAUTY",
         "price": "42.99", "category": "foundation", "sizes": ["Light", "Deep"]},
        {"id": 3, "name": "Duplicate", "brand": "X", "price": "1.00"}
    ]"#;

    #[test]
    fn test_lookup_by_id() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);

        let foundation = catalog.product(ProductId::new(3)).unwrap();
        assert_eq!(foundation.name, "Flawless Coverage Foundation");
        assert_eq!(foundation.price, Decimal::new(4299, 2));
        assert!(catalog.product(ProductId::new(42)).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        let ids: Vec<_> = catalog
            .search("LIP", None)
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.search("foundation", None).len(), 1);
        assert!(catalog.search("   ", None).is_empty());
    }

    #[test]
    fn test_search_limit() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        let ids: Vec<_> = catalog
            .search("yasira", Some(2))
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.search("yasira", Some(0)).len(), 0);
    }

    fn filtered_ids(catalog: &JsonCatalog, query: &CatalogQuery) -> Vec<i64> {
        catalog.filter(query).iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_filter_default_is_catalog_order() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        assert_eq!(filtered_ids(&catalog, &CatalogQuery::default()), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        let query = CatalogQuery {
            category: Some("Lipstick".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(filtered_ids(&catalog, &query), vec![1, 2]);

        let query = CatalogQuery {
            price_range: Some(Decimal::new(2299, 2)..=Decimal::new(2899, 2)),
            ..CatalogQuery::default()
        };
        assert_eq!(filtered_ids(&catalog, &query), vec![1, 2]);

        let query = CatalogQuery {
            category: Some("lipstick".to_owned()),
            price_range: Some(Decimal::new(25, 0)..=Decimal::new(100, 0)),
            ..CatalogQuery::default()
        };
        assert_eq!(filtered_ids(&catalog, &query), vec![1]);
    }

    #[test]
    fn test_filter_by_brand() {
        let catalog = JsonCatalog::new(vec![
            ProductSnapshot::new(ProductId::new(1), "A", "YASIRA BEAUTY", Decimal::ONE),
            ProductSnapshot::new(ProductId::new(2), "B", "Maison Clé", Decimal::ONE),
        ]);
        let query = CatalogQuery {
            brands: vec!["Maison Clé".to_owned()],
            ..CatalogQuery::default()
        };
        assert_eq!(filtered_ids(&catalog, &query), vec![2]);
    }

    #[test]
    fn test_sort_orders() {
        let catalog = JsonCatalog::from_json(CATALOG).unwrap();
        let sorted = |sort| {
            let query = CatalogQuery {
                sort,
                ..CatalogQuery::default()
            };
            filtered_ids(&catalog, &query)
        };

        assert_eq!(sorted(CatalogSort::PriceLow), vec![2, 1, 3]);
        assert_eq!(sorted(CatalogSort::PriceHigh), vec![3, 1, 2]);
        assert_eq!(sorted(CatalogSort::Newest), vec![3, 2, 1]);
        assert_eq!(sorted(CatalogSort::Name), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_from_str() {
        assert_eq!("price-low".parse::<CatalogSort>().unwrap(), CatalogSort::PriceLow);
        assert_eq!("newest".parse::<CatalogSort>().unwrap(), CatalogSort::Newest);
        assert!(matches!(
            "rating".parse::<CatalogSort>(),
            Err(CatalogError::UnknownSort(name)) if name == "rating"
        ));
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            JsonCatalog::from_json("{}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = JsonCatalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
