//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! yasira cart add 1 --quantity 2 --color "Ruby Red"
//! yasira cart update 1 3 --color "Ruby Red"
//! yasira cart remove 1
//! yasira cart show
//! ```

use yasira_core::{Price, ProductId, VariantSelection};
use yasira_storefront::{CartLine, LineKey};

use super::{CommandError, Context};

/// Color/size pair scoping an operation to a single line.
pub type Variant = (Option<String>, Option<String>);

fn selection((color, size): Variant) -> VariantSelection {
    VariantSelection { color, size }
}

/// Snapshot the product from the catalog and add it.
pub fn add(
    ctx: &mut Context,
    product_id: ProductId,
    quantity: u32,
    color: Option<String>,
    size: Option<String>,
) -> Result<(), CommandError> {
    let product = ctx.product(product_id)?;
    let name = product.name.clone();
    let line_quantity = ctx
        .state
        .add_to_cart(product, selection((color, size)), quantity)?;

    tracing::info!(%product_id, quantity, line_quantity, "Added to cart");
    ctx.say(&format!("{name} x{line_quantity} in cart"));
    Ok(())
}

/// Remove one line when a variant is given, otherwise every line of the product.
pub fn remove(ctx: &mut Context, product_id: ProductId, variant: Option<Variant>) {
    let removed = match variant {
        Some(variant) => {
            let key = LineKey::new(product_id, selection(variant));
            usize::from(ctx.state.remove_cart_line(&key))
        }
        None => ctx.state.remove_from_cart(product_id),
    };
    ctx.say(&format!("Removed {removed} line(s)"));
}

/// Set a quantity on one line when a variant is given, otherwise on every
/// line of the product.
pub fn update(
    ctx: &mut Context,
    product_id: ProductId,
    quantity: u32,
    variant: Option<Variant>,
) -> Result<(), CommandError> {
    let affected = match variant {
        Some(variant) => {
            let key = LineKey::new(product_id, selection(variant));
            usize::from(ctx.state.update_cart_line_quantity(&key, quantity)?)
        }
        None => ctx.state.update_cart_quantity(product_id, quantity)?,
    };
    ctx.say(&format!("Updated {affected} line(s)"));
    Ok(())
}

/// Empty the cart.
pub fn clear(ctx: &mut Context) {
    ctx.state.clear_cart();
    ctx.say("Cart cleared");
}

/// Print every line with its total, then the cart total.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) -> Result<(), CommandError> {
    let cart = ctx.state.cart();
    if ctx.json {
        return super::print_json(&cart.to_record());
    }

    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    let currency = ctx.config.pricing.currency;
    for line in cart.lines() {
        println!(
            "{:>4}  {:<40} x{:<3} {}",
            line.product().id.as_i64(),
            describe(line),
            line.quantity(),
            Price::new(line.line_total(), currency)
        );
    }
    println!(
        "Items: {}  Total: {}",
        cart.item_count(),
        cart.total_price(currency)
    );
    Ok(())
}

fn describe(line: &CartLine) -> String {
    let variant: Vec<&str> = [line.selected_color(), line.selected_size()]
        .into_iter()
        .flatten()
        .collect();
    if variant.is_empty() {
        line.product().name.clone()
    } else {
        format!("{} ({})", line.product().name, variant.join(", "))
    }
}
