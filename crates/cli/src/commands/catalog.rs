//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! yasira catalog search lip --limit 3
//! yasira catalog list --category lipstick --max-price 30 --sort price-low
//! ```

use yasira_core::{CurrencyCode, ProductSnapshot};
use yasira_storefront::{Catalog, CatalogQuery};

use super::{CommandError, Context};

/// Free-text lookup over name, brand and category.
pub fn search(ctx: &mut Context, query: &str, limit: Option<usize>) -> Result<(), CommandError> {
    let (json, currency) = (ctx.json, ctx.config.pricing.currency);
    let found = ctx.catalog()?.search(query, limit);
    tracing::debug!(query, results = found.len(), "Searched catalog");
    print(&found, json, currency)
}

/// Filtered and sorted catalog page.
pub fn list(ctx: &mut Context, query: &CatalogQuery) -> Result<(), CommandError> {
    let (json, currency) = (ctx.json, ctx.config.pricing.currency);
    let found = ctx.catalog()?.filter(query);
    print(&found, json, currency)
}

#[allow(clippy::print_stdout)]
fn print(
    products: &[&ProductSnapshot],
    json: bool,
    currency: CurrencyCode,
) -> Result<(), CommandError> {
    if json {
        return super::print_json(&products);
    }
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    for product in products {
        println!("{}", format_row(product, currency));
    }
    Ok(())
}

fn format_row(product: &ProductSnapshot, currency: CurrencyCode) -> String {
    format!(
        "{:>4}  {:<40} {:<16} {}",
        product.id.as_i64(),
        product.name,
        product.brand,
        product.unit_price(currency)
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use yasira_core::ProductId;

    use super::*;

    #[test]
    fn test_format_row() {
        let product = ProductSnapshot::new(
            ProductId::new(7),
            "Glossy Lip Tint",
            "YASIRA BEAUTY",
            Decimal::new(2299, 2),
        );
        let row = format_row(&product, CurrencyCode::EUR);
        assert!(row.starts_with("   7  Glossy Lip Tint"));
        assert!(row.ends_with("€22.99"));
    }
}
