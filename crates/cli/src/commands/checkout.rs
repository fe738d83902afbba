//! Checkout commands.

use yasira_storefront::OrderSummary;

use super::{CommandError, Context};

/// Print the order summary for the current cart.
#[allow(clippy::print_stdout)]
pub fn summary(ctx: &Context) -> Result<(), CommandError> {
    let summary = OrderSummary::for_cart(ctx.state.cart(), &ctx.config.pricing);
    if ctx.json {
        return super::print_json(&summary);
    }

    print_summary(&summary);
    if let Some(remaining) = summary.free_shipping_remaining {
        println!("Add {remaining} more for free shipping");
    }
    Ok(())
}

/// Place the order, print the confirmation and empty the cart.
#[allow(clippy::print_stdout)]
pub fn place(ctx: &mut Context) -> Result<(), CommandError> {
    let pricing = ctx.config.pricing;
    let confirmation = ctx.state.place_order(&pricing)?;
    if ctx.json {
        return super::print_json(&confirmation);
    }

    println!("Order {} placed", confirmation.order_number);
    print_summary(&confirmation.summary);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &OrderSummary) {
    println!("Subtotal  {}", summary.subtotal);
    if summary.ships_free() {
        println!("Shipping  FREE");
    } else {
        println!("Shipping  {}", summary.shipping);
    }
    println!("Tax       {}", summary.tax);
    println!("Total     {}", summary.total);
}
